use crate::{
    context::{AlertsContext, ChatContext, PriceTrendContext, SchemesContext, WeatherContext},
    invoker::{BackendConnector, GoogleConnector, Invocation, Invoker, ModelConfig},
    normalize,
    opentelemetry::trace_request,
    prompts,
    store::ActivityStore,
    task::{self, TaskDescriptor},
    ActivityRecord, AdvisoryResult, ConversationTurn, FarmerProfile, ImageAttachment,
    MediatorParams, PriceTrendData, RequestKind, SchemeReminder, SmartAlert, WeatherForecast,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Mediates every advisory request between local farm state and the
/// generative backend.
///
/// All operations return a value; none panic. The backend handle is created
/// on first use and shared by every later call, so a `Mediator` is meant to be
/// built once and shared (it is `Send + Sync`).
pub struct Mediator {
    invoker: Invoker,
    activity_store: Arc<dyn ActivityStore>,
    today: fn() -> NaiveDate,
}

impl Mediator {
    #[must_use]
    pub fn new(params: MediatorParams) -> Self {
        Self {
            invoker: Invoker::new(params.connector, params.models),
            activity_store: params.activity_store,
            today: params.today,
        }
    }

    pub fn builder(connector: impl BackendConnector + 'static) -> MediatorParams {
        MediatorParams::new(connector)
    }

    /// A mediator talking to Gemini with the key from `GOOGLE_API_KEY` and
    /// model ids from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder(GoogleConnector::default())
            .models(ModelConfig::from_env())
            .build()
    }

    /// Answer a chat message in the context of the farmer's profile, the
    /// stored activity history and the conversation so far.
    pub async fn converse(
        &self,
        profile: &FarmerProfile,
        history: &[ConversationTurn],
        new_message: &str,
        image: Option<&ImageAttachment>,
    ) -> AdvisoryResult<String> {
        trace_request(RequestKind::Chat, async {
            let activities = self.stored_activities().await;
            let context = ChatContext::assemble(profile, &activities, history, new_message, image);
            let invocation = Invocation::chat(
                prompts::chat_system_instruction(&context),
                prompts::chat_contents(&context),
            );
            let raw = self.invoker.invoke(invocation).await?;
            normalize::chat(raw)
        })
        .await
    }

    pub async fn weather_forecast(&self, location: &str) -> AdvisoryResult<WeatherForecast> {
        self.run_task(&task::WEATHER, WeatherContext::assemble(location))
            .await
    }

    /// Simulated 30-day price history ending today plus a 7-day prediction.
    pub async fn price_trend(&self, crop: &str, location: &str) -> AdvisoryResult<PriceTrendData> {
        let context = PriceTrendContext::assemble(crop, location, (self.today)());
        self.run_task(&task::PRICE_TREND, context).await
    }

    pub async fn scheme_reminders(
        &self,
        profile: &FarmerProfile,
    ) -> AdvisoryResult<Vec<SchemeReminder>> {
        self.run_task(&task::SCHEMES, SchemesContext::assemble(profile))
            .await
    }

    /// Prioritized alerts for the farm. Only the last five entries of
    /// `activity_history` are considered.
    pub async fn smart_alerts(
        &self,
        profile: &FarmerProfile,
        activity_history: &[ActivityRecord],
    ) -> AdvisoryResult<Vec<SmartAlert>> {
        self.run_task(
            &task::ALERTS,
            AlertsContext::assemble(profile, activity_history),
        )
        .await
    }

    async fn run_task<C, T>(&self, task: &TaskDescriptor<C, T>, context: C) -> AdvisoryResult<T>
    where
        T: DeserializeOwned,
    {
        trace_request(task.kind, async {
            let schema = (task.schema)();
            let invocation =
                Invocation::structured(task.kind, (task.prompt)(&context), schema.clone());
            let raw = self.invoker.invoke(invocation).await?;
            normalize::structured(task.kind, &schema, &raw)
        })
        .await
    }

    async fn stored_activities(&self) -> Vec<ActivityRecord> {
        match self.activity_store.load_activities().await {
            Ok(activities) => activities,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable activity history");
                Vec::new()
            }
        }
    }
}
