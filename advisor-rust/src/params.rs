use crate::{
    invoker::{BackendConnector, ModelConfig},
    store::{ActivityStore, NoActivityStore},
    Mediator,
};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Parameters required to create a new mediator.
/// # Default Values
/// - `activity_store`: [`NoActivityStore`]
/// - `models`: [`ModelConfig::default`]
/// - `today`: the local calendar date
pub struct MediatorParams {
    /// Produces the backend on first use.
    pub connector: Box<dyn BackendConnector>,
    /// Where chat reads the farmer's activity history from.
    pub activity_store: Arc<dyn ActivityStore>,
    /// Model ids for text-only and image requests.
    pub models: ModelConfig,
    /// Reference date for price-trend windows.
    pub today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl MediatorParams {
    pub fn new(connector: impl BackendConnector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            activity_store: Arc::new(NoActivityStore),
            models: ModelConfig::default(),
            today: local_today,
        }
    }

    /// Set the activity store
    #[must_use]
    pub fn activity_store(mut self, activity_store: Arc<dyn ActivityStore>) -> Self {
        self.activity_store = activity_store;
        self
    }

    /// Set the model ids
    #[must_use]
    pub fn models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Set the clock used for date windows
    #[must_use]
    pub fn today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn build(self) -> Mediator {
        Mediator::new(self)
    }
}
