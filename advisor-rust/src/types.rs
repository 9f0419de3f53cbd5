use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The farmer the advice is for. Supplied fresh by the caller on every
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    pub name: String,
    pub location: String,
    /// Cultivated land in acres.
    pub land_size: f64,
    pub main_crop: String,
    pub soil_type: String,
    pub irrigation_method: String,
}

/// Kind of field work recorded in the activity log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Sowing,
    Irrigation,
    Fertilization,
    #[serde(rename = "Pest Control")]
    PestControl,
    Harvesting,
    Observation,
}

/// One entry of the farmer's activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Model,
    /// Local notices shown in the chat window. Never sent to the backend.
    System,
}

/// An image attached to a chat message, e.g. a photo of a diseased leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttachment {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// A turn of the conversation as the chat window keeps it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: ConversationRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherDay {
    /// Day label, e.g. "Monday" or "Today".
    pub day: String,
    pub temp_high: f64,
    pub temp_low: f64,
    pub condition: String,
    /// Chance of precipitation in percent, 0 to 100.
    pub precipitation_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    pub location: String,
    pub forecast: Vec<WeatherDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceDataPoint {
    pub date: NaiveDate,
    /// Price in INR per quintal.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceTrendData {
    pub crop: String,
    pub location: String,
    pub historical: Vec<PriceDataPoint>,
    pub predicted: Vec<PriceDataPoint>,
    pub summary: String,
}

/// A government support programme the farmer may apply to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemeReminder {
    pub scheme_name: String,
    pub description: String,
    pub eligibility: String,
    pub deadline: NaiveDate,
    pub application_link: String,
}

/// Alert priority. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmartAlert {
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    /// Generation time as reported by the backend, ISO 8601.
    pub timestamp: String,
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
