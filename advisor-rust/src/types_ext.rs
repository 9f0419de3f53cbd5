use crate::{
    errors::{ActivityError, ProfileError},
    ActivityRecord, ActivityType, ConversationRole, ConversationTurn, FarmerProfile,
    ImageAttachment, PriceTrendData, Priority, SmartAlert,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fmt;

impl FarmerProfile {
    /// Check the fields the profile form requires.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let required = [
            ("name", &self.name),
            ("location", &self.location),
            ("mainCrop", &self.main_crop),
            ("soilType", &self.soil_type),
            ("irrigationMethod", &self.irrigation_method),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ProfileError::MissingField(*field));
        }
        if !self.land_size.is_finite() || self.land_size <= 0.0 {
            return Err(ProfileError::InvalidLandSize);
        }
        Ok(())
    }
}

impl ActivityType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sowing => "Sowing",
            Self::Irrigation => "Irrigation",
            Self::Fertilization => "Fertilization",
            Self::PestControl => "Pest Control",
            Self::Harvesting => "Harvesting",
            Self::Observation => "Observation",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ActivityRecord {
    /// Create a log entry the way the activity form does: the id is the
    /// creation time and notes must not be blank.
    pub fn log(
        date: NaiveDate,
        activity_type: ActivityType,
        notes: &str,
    ) -> Result<Self, ActivityError> {
        Self::log_at(Utc::now(), date, activity_type, notes)
    }

    pub fn log_at(
        created_at: DateTime<Utc>,
        date: NaiveDate,
        activity_type: ActivityType,
        notes: &str,
    ) -> Result<Self, ActivityError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(ActivityError::EmptyNotes);
        }
        Ok(Self {
            id: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            date,
            activity_type,
            notes: notes.to_string(),
        })
    }
}

impl ImageAttachment {
    pub fn new(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Decode an attachment handed over as a base64 string.
    pub fn from_base64(
        encoded: &str,
        mime_type: impl Into<String>,
    ) -> Result<Self, base64::DecodeError> {
        Ok(Self::new(BASE64_STANDARD.decode(encoded)?, mime_type))
    }
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::User,
            content: content.into(),
            image: None,
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::Model,
            content: content.into(),
            image: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::System,
            content: content.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

impl Priority {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Order alerts by priority, highest first, and keep at most `limit`.
/// Alerts of equal priority keep the order the backend produced.
#[must_use]
pub fn rank_alerts(mut alerts: Vec<SmartAlert>, limit: usize) -> Vec<SmartAlert> {
    alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
    alerts.truncate(limit);
    alerts
}

impl PriceTrendData {
    /// The most recent observed price.
    #[must_use]
    pub fn latest_price(&self) -> Option<f64> {
        self.historical.last().map(|point| point.price)
    }

    /// Difference between the last predicted and the last observed price.
    #[must_use]
    pub fn predicted_change(&self) -> Option<f64> {
        match (self.latest_price(), self.predicted.last()) {
            (Some(latest), Some(predicted)) => Some(predicted.price - latest),
            _ => None,
        }
    }
}
