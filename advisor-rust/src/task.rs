//! Per-kind descriptors for the structured request pipeline.

use crate::{
    context::{AlertsContext, PriceTrendContext, SchemesContext, WeatherContext},
    prompts,
    schema::{Property, Schema},
    PriceTrendData, SchemeReminder, SmartAlert, WeatherForecast,
};
use std::{fmt, marker::PhantomData};

const CHAT_FAILURE: &str = "Sorry, I'm having trouble connecting to the AI service. Please check your connection or API key and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Chat,
    Weather,
    PriceTrend,
    Schemes,
    Alerts,
}

impl RequestKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Weather => "weather",
            Self::PriceTrend => "price-trend",
            Self::Schemes => "schemes",
            Self::Alerts => "alerts",
        }
    }

    /// Human wording used inside user-facing messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Weather => "weather",
            Self::PriceTrend => "price trend",
            Self::Schemes => "scheme",
            Self::Alerts => "alert",
        }
    }

    /// User-safe message returned when the backend call itself fails.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Chat => CHAT_FAILURE,
            Self::Weather => WEATHER.failure_message,
            Self::PriceTrend => PRICE_TREND.failure_message,
            Self::Schemes => SCHEMES.failure_message,
            Self::Alerts => ALERTS.failure_message,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that distinguishes one structured request kind from another:
/// how to render its prompt from a context bundle `C`, the shape its answer
/// must take, and what to tell the user when the call fails. `T` is the
/// typed payload produced on success.
pub struct TaskDescriptor<C, T> {
    pub kind: RequestKind,
    pub prompt: fn(&C) -> String,
    pub schema: fn() -> Schema,
    pub failure_message: &'static str,
    payload: PhantomData<fn() -> T>,
}

impl<C, T> TaskDescriptor<C, T> {
    const fn new(
        kind: RequestKind,
        prompt: fn(&C) -> String,
        schema: fn() -> Schema,
        failure_message: &'static str,
    ) -> Self {
        Self {
            kind,
            prompt,
            schema,
            failure_message,
            payload: PhantomData,
        }
    }
}

pub const WEATHER: TaskDescriptor<WeatherContext, WeatherForecast> = TaskDescriptor::new(
    RequestKind::Weather,
    prompts::weather_prompt,
    weather_schema,
    "Could not fetch weather data.",
);

pub const PRICE_TREND: TaskDescriptor<PriceTrendContext, PriceTrendData> = TaskDescriptor::new(
    RequestKind::PriceTrend,
    prompts::price_trend_prompt,
    price_trend_schema,
    "Could not fetch price trend data.",
);

pub const SCHEMES: TaskDescriptor<SchemesContext, Vec<SchemeReminder>> = TaskDescriptor::new(
    RequestKind::Schemes,
    prompts::schemes_prompt,
    schemes_schema,
    "Could not fetch scheme reminders.",
);

pub const ALERTS: TaskDescriptor<AlertsContext, Vec<SmartAlert>> = TaskDescriptor::new(
    RequestKind::Alerts,
    prompts::alerts_prompt,
    alerts_schema,
    "Could not fetch smart alerts.",
);

const PRIORITIES: &[&str] = &["High", "Medium", "Low"];

#[must_use]
pub fn weather_schema() -> Schema {
    Schema::object(vec![
        Property::required("location", Schema::string()),
        Property::required(
            "forecast",
            Schema::array(Schema::object(vec![
                Property::required(
                    "day",
                    Schema::string().describe("Day of the week, e.g., 'Monday'"),
                ),
                Property::required(
                    "temp_high",
                    Schema::number().describe("Maximum temperature in Celsius"),
                ),
                Property::required(
                    "temp_low",
                    Schema::number().describe("Minimum temperature in Celsius"),
                ),
                Property::required(
                    "condition",
                    Schema::string().describe("e.g., 'Sunny', 'Cloudy', 'Rain'"),
                ),
                Property::required(
                    "precipitation_chance",
                    Schema::number_between(0.0, 100.0).describe("Percentage from 0 to 100"),
                ),
            ])),
        ),
    ])
}

fn price_point() -> Schema {
    Schema::object(vec![
        Property::required("date", Schema::date()),
        Property::required("price", Schema::number().describe("Price in INR per quintal")),
    ])
}

#[must_use]
pub fn price_trend_schema() -> Schema {
    Schema::object(vec![
        Property::required("crop", Schema::string()),
        Property::required("location", Schema::string()),
        Property::required("historical", Schema::array(price_point())),
        Property::required("predicted", Schema::array(price_point())),
        Property::required(
            "summary",
            Schema::string().describe("A brief analysis of the price trend and prediction."),
        ),
    ])
}

#[must_use]
pub fn schemes_schema() -> Schema {
    Schema::array(Schema::object(vec![
        Property::required("schemeName", Schema::string()),
        Property::required("description", Schema::string()),
        Property::required("eligibility", Schema::string()),
        Property::required("deadline", Schema::date()),
        Property::required(
            "applicationLink",
            Schema::string().describe("A placeholder link like '#'"),
        ),
    ]))
}

#[must_use]
pub fn alerts_schema() -> Schema {
    Schema::array(Schema::object(vec![
        Property::required("id", Schema::string().describe("A unique identifier for the alert")),
        Property::required("title", Schema::string()),
        Property::required("message", Schema::string()),
        Property::required("priority", Schema::one_of(PRIORITIES)),
        Property::required(
            "timestamp",
            Schema::string().describe("ISO 8601 timestamp of the alert"),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_messages_per_kind() {
        assert_eq!(
            RequestKind::Weather.failure_message(),
            "Could not fetch weather data."
        );
        assert_eq!(
            RequestKind::Alerts.failure_message(),
            "Could not fetch smart alerts."
        );
        assert!(RequestKind::Chat
            .failure_message()
            .starts_with("Sorry, I'm having trouble connecting"));
    }

    #[test]
    fn alert_priority_is_a_closed_set() {
        let rendered = alerts_schema().to_json_schema();
        assert_eq!(
            rendered["items"]["properties"]["priority"]["enum"],
            json!(["High", "Medium", "Low"])
        );
        assert_eq!(
            rendered["items"]["required"],
            json!(["id", "title", "message", "priority", "timestamp"])
        );
    }

    #[test]
    fn weather_schema_bounds_precipitation() {
        let day = json!({
            "day": "Monday",
            "temp_high": 31.5,
            "temp_low": 22,
            "condition": "Sunny",
            "precipitation_chance": 120
        });
        let violation = weather_schema()
            .validate(&json!({ "location": "Mandya", "forecast": [day] }))
            .unwrap_err();
        assert_eq!(violation.path, "$.forecast[0].precipitation_chance");
    }

    #[test]
    fn price_points_require_dates() {
        let value = json!({
            "crop": "Tomato",
            "location": "Kolar",
            "historical": [{ "date": "yesterday", "price": 1800 }],
            "predicted": [],
            "summary": "Stable."
        });
        assert_eq!(
            price_trend_schema().validate(&value).unwrap_err().path,
            "$.historical[0].date"
        );
    }
}
