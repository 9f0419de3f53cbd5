//! Turns raw backend text into mediator results.

use crate::{schema::Schema, AdvisoryError, AdvisoryResult, RequestKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Chat answers are passed through untouched.
pub fn chat(raw: String) -> AdvisoryResult<String> {
    Ok(raw)
}

/// Parse `raw` as JSON, surface an `error` field the backend reported itself,
/// check the result against `schema` and deserialize it.
pub fn structured<T: DeserializeOwned>(
    kind: RequestKind,
    schema: &Schema,
    raw: &str,
) -> AdvisoryResult<T> {
    let value: Value = serde_json::from_str(strip_code_fence(raw)).map_err(|err| {
        warn!(kind = %kind, error = %err, "AI service returned unparseable JSON");
        AdvisoryError::malformed(kind)
    })?;

    if let Some(reported) = reported_error(&value) {
        warn!(kind = %kind, message = %reported, "AI service reported an error");
        return Err(AdvisoryError::reported(reported));
    }

    schema.validate(&value).map_err(|violation| {
        warn!(kind = %kind, %violation, "AI service response does not match the declared schema");
        AdvisoryError::malformed(kind)
    })?;

    serde_json::from_value(value).map_err(|err| {
        warn!(kind = %kind, error = %err, "AI service response could not be deserialized");
        AdvisoryError::malformed(kind)
    })
}

fn reported_error(value: &Value) -> Option<String> {
    match value.as_object()?.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(details) => Some(
            details
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| Value::Object(details.clone()).to_string(), str::to_string),
        ),
        other => Some(other.to_string()),
    }
}

/// Some models wrap JSON in a Markdown code fence even when asked not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::Property, task, ServiceErrorKind, SmartAlert, WeatherForecast,
    };

    fn name_schema() -> Schema {
        Schema::object(vec![Property::required("name", Schema::string())])
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn chat_text_is_returned_verbatim() {
        let raw = "  Irrigate tomorrow morning.\n".to_string();
        assert_eq!(chat(raw.clone()), Ok(raw));
    }

    #[test]
    fn reported_error_wins_over_schema() {
        let result: AdvisoryResult<Named> =
            structured(RequestKind::PriceTrend, &name_schema(), r#"{"error": "quota exceeded"}"#);
        assert_eq!(
            result,
            Err(AdvisoryError::Service {
                kind: ServiceErrorKind::Reported,
                message: "quota exceeded".to_string(),
            })
        );
    }

    #[test]
    fn nested_error_objects_use_their_message() {
        let result: AdvisoryResult<Named> = structured(
            RequestKind::Weather,
            &name_schema(),
            r#"{"error": {"code": 429, "message": "Resource exhausted"}}"#,
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Resource exhausted".to_string()
        );
    }

    #[test]
    fn invalid_json_is_malformed() {
        let result: AdvisoryResult<Named> =
            structured(RequestKind::Schemes, &name_schema(), "[{\"schemeName\": ");
        let err = result.unwrap_err();
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Malformed));
        assert_eq!(
            err.to_string(),
            "Could not parse scheme data returned by the AI service."
        );
    }

    #[test]
    fn schema_violation_is_malformed() {
        let raw = r#"[{"id": "a1", "title": "Rain", "message": "Cover harvest", "priority": "Urgent", "timestamp": "2025-06-01T06:00:00Z"}]"#;
        let result: AdvisoryResult<Vec<SmartAlert>> =
            structured(RequestKind::Alerts, &task::alerts_schema(), raw);
        assert_eq!(
            result.unwrap_err().service_kind(),
            Some(ServiceErrorKind::Malformed)
        );
    }

    #[test]
    fn fenced_json_is_accepted_and_normalization_is_repeatable() {
        let raw = "```json\n{\"location\": \"Mandya\", \"forecast\": [{\"day\": \"Monday\", \"temp_high\": 31, \"temp_low\": 21, \"condition\": \"Sunny\", \"precipitation_chance\": 10}]}\n```";
        let first: WeatherForecast =
            structured(RequestKind::Weather, &task::weather_schema(), raw).unwrap();
        let second: WeatherForecast =
            structured(RequestKind::Weather, &task::weather_schema(), raw).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.forecast.len(), 1);
        assert!((first.forecast[0].temp_high - 31.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_error_field_is_ignored() {
        let parsed: Named = structured(
            RequestKind::Weather,
            &name_schema(),
            r#"{"name": "ok", "error": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "ok");
    }
}
