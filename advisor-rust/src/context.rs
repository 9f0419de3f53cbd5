//! Context assembly: normalizes caller-supplied state into immutable bundles.
//! Nothing here touches the network or storage.

use crate::{ActivityRecord, ConversationRole, ConversationTurn, FarmerProfile, ImageAttachment};
use chrono::NaiveDate;
use krishi_genai::InlineDataPart;

/// How many of the latest activity records are ever shown to the model.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// The most recent activity records, in stored order. Older history is
/// dropped, never summarized.
#[must_use]
pub fn recent_activities(history: &[ActivityRecord]) -> &[ActivityRecord] {
    let start = history.len().saturating_sub(RECENT_ACTIVITY_LIMIT);
    &history[start..]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatContext {
    pub profile: FarmerProfile,
    pub recent_activities: Vec<ActivityRecord>,
    /// Prior user and model turns, oldest first.
    pub history: Vec<ConversationTurn>,
    pub utterance: String,
    pub image: Option<InlineDataPart>,
}

impl ChatContext {
    pub fn assemble(
        profile: &FarmerProfile,
        activities: &[ActivityRecord],
        history: &[ConversationTurn],
        utterance: &str,
        image: Option<&ImageAttachment>,
    ) -> Self {
        Self {
            profile: profile.clone(),
            recent_activities: recent_activities(activities).to_vec(),
            history: history
                .iter()
                .filter(|turn| matches!(turn.role, ConversationRole::User | ConversationRole::Model))
                .cloned()
                .collect(),
            utterance: utterance.to_string(),
            image: image.map(|image| InlineDataPart::from_bytes(&image.data, &image.mime_type)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherContext {
    pub location: String,
}

impl WeatherContext {
    pub fn assemble(location: &str) -> Self {
        Self {
            location: location.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTrendContext {
    pub crop: String,
    pub location: String,
    /// The day the historical window ends on.
    pub today: NaiveDate,
}

impl PriceTrendContext {
    pub fn assemble(crop: &str, location: &str, today: NaiveDate) -> Self {
        Self {
            crop: crop.trim().to_string(),
            location: location.trim().to_string(),
            today,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemesContext {
    pub profile: FarmerProfile,
}

impl SchemesContext {
    pub fn assemble(profile: &FarmerProfile) -> Self {
        Self {
            profile: profile.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsContext {
    pub profile: FarmerProfile,
    pub recent_activities: Vec<ActivityRecord>,
}

impl AlertsContext {
    pub fn assemble(profile: &FarmerProfile, activities: &[ActivityRecord]) -> Self {
        Self {
            profile: profile.clone(),
            recent_activities: recent_activities(activities).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActivityType;

    fn record(day: u32) -> ActivityRecord {
        ActivityRecord {
            id: format!("log-{day}"),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            activity_type: ActivityType::Observation,
            notes: format!("day {day}"),
        }
    }

    fn profile() -> FarmerProfile {
        FarmerProfile {
            name: "Lakshmi".to_string(),
            location: "Dharwad".to_string(),
            land_size: 4.0,
            main_crop: "Cotton".to_string(),
            soil_type: "Black".to_string(),
            irrigation_method: "Rainfed".to_string(),
        }
    }

    #[test]
    fn keeps_only_the_last_five_in_stored_order() {
        let history: Vec<_> = (1..=8).map(record).collect();
        let ids: Vec<_> = recent_activities(&history)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["log-4", "log-5", "log-6", "log-7", "log-8"]);

        let short: Vec<_> = (1..=3).map(record).collect();
        assert_eq!(recent_activities(&short).len(), 3);
        assert!(recent_activities(&[]).is_empty());
    }

    #[test]
    fn chat_context_filters_roles_and_encodes_image() {
        let history = vec![
            ConversationTurn::model("Namaskara! How can I help?"),
            ConversationTurn::system("Voice input unavailable"),
            ConversationTurn::user("When should I irrigate?"),
        ];
        let image = ImageAttachment::new(b"leaf".to_vec(), "image/jpeg");

        let context = ChatContext::assemble(
            &profile(),
            &(1..=6).map(record).collect::<Vec<_>>(),
            &history,
            "What is on this leaf?",
            Some(&image),
        );

        assert_eq!(context.history.len(), 2);
        assert_eq!(context.history[0].role, ConversationRole::Model);
        assert_eq!(context.history[1].role, ConversationRole::User);
        assert_eq!(context.recent_activities.len(), 5);
        assert_eq!(context.recent_activities[0].id, "log-2");
        assert_eq!(
            context.image,
            Some(InlineDataPart::new("bGVhZg==", "image/jpeg"))
        );
    }
}
