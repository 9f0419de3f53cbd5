//! Declared response shapes.
//!
//! A [`Schema`] is sent to the backend as the output constraint of a request
//! and is used again to check the answer before it is deserialized into a
//! typed payload. Fields not declared in the schema are ignored.

use chrono::NaiveDate;
use krishi_genai::JSONSchema;
use serde_json::{json, Map, Value};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String {
        description: Option<&'static str>,
        /// Closed set of allowed values.
        values: Option<&'static [&'static str]>,
        format: Option<StringFormat>,
    },
    Number {
        description: Option<&'static str>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Array {
        description: Option<&'static str>,
        items: Box<Schema>,
    },
    Object {
        description: Option<&'static str>,
        properties: Vec<Property>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Calendar date as `YYYY-MM-DD`.
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

/// First mismatch between a value and its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaViolation {
    /// JSON path of the offending value, e.g. `$.forecast[2].temp_high`.
    pub path: String,
    pub reason: String,
}

impl Property {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
        }
    }
}

impl Schema {
    #[must_use]
    pub fn string() -> Self {
        Self::String {
            description: None,
            values: None,
            format: None,
        }
    }

    #[must_use]
    pub fn date() -> Self {
        Self::String {
            description: Some("Date in YYYY-MM-DD format"),
            values: None,
            format: Some(StringFormat::Date),
        }
    }

    #[must_use]
    pub fn one_of(values: &'static [&'static str]) -> Self {
        Self::String {
            description: None,
            values: Some(values),
            format: None,
        }
    }

    #[must_use]
    pub fn number() -> Self {
        Self::Number {
            description: None,
            minimum: None,
            maximum: None,
        }
    }

    #[must_use]
    pub fn number_between(minimum: f64, maximum: f64) -> Self {
        Self::Number {
            description: None,
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::Array {
            description: None,
            items: Box::new(items),
        }
    }

    #[must_use]
    pub fn object(properties: Vec<Property>) -> Self {
        Self::Object {
            description: None,
            properties,
        }
    }

    /// Attach a description that is passed on to the backend.
    #[must_use]
    pub fn describe(mut self, text: &'static str) -> Self {
        match &mut self {
            Self::String { description, .. }
            | Self::Number { description, .. }
            | Self::Array { description, .. }
            | Self::Object { description, .. } => *description = Some(text),
        }
        self
    }

    /// Render the schema as the JSON Schema document the backend accepts.
    #[must_use]
    pub fn to_json_schema(&self) -> JSONSchema {
        let (mut document, description) = match self {
            Self::String {
                description,
                values,
                format,
            } => {
                let mut document = json!({ "type": "string" });
                if let Some(values) = values {
                    document["enum"] = json!(values);
                }
                if let Some(StringFormat::Date) = format {
                    document["format"] = json!("date");
                }
                (document, description)
            }
            Self::Number {
                description,
                minimum,
                maximum,
            } => {
                let mut document = json!({ "type": "number" });
                if let Some(minimum) = minimum {
                    document["minimum"] = json!(minimum);
                }
                if let Some(maximum) = maximum {
                    document["maximum"] = json!(maximum);
                }
                (document, description)
            }
            Self::Array { description, items } => (
                json!({ "type": "array", "items": items.to_json_schema() }),
                description,
            ),
            Self::Object {
                description,
                properties,
            } => {
                let rendered: Map<String, Value> = properties
                    .iter()
                    .map(|p| (p.name.to_string(), p.schema.to_json_schema()))
                    .collect();
                let required: Vec<&str> = properties
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name)
                    .collect();
                let ordering: Vec<&str> = properties.iter().map(|p| p.name).collect();
                (
                    json!({
                        "type": "object",
                        "properties": rendered,
                        "required": required,
                        "propertyOrdering": ordering,
                    }),
                    description,
                )
            }
        };

        if let Some(description) = description {
            document["description"] = json!(description);
        }
        document
    }

    /// Check `value` against the schema.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let violation = |reason: String| SchemaViolation {
            path: path.to_string(),
            reason,
        };

        match self {
            Self::String { values, format, .. } => {
                let text = value
                    .as_str()
                    .ok_or_else(|| violation(format!("expected string, found {}", kind_of(value))))?;
                if let Some(values) = values {
                    if !values.iter().any(|allowed| *allowed == text) {
                        return Err(violation(format!(
                            "`{text}` is not one of {}",
                            values.join(", ")
                        )));
                    }
                }
                if let Some(StringFormat::Date) = format {
                    if !is_calendar_date(text) {
                        return Err(violation(format!("`{text}` is not a YYYY-MM-DD date")));
                    }
                }
                Ok(())
            }
            Self::Number {
                minimum, maximum, ..
            } => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| violation(format!("expected number, found {}", kind_of(value))))?;
                if minimum.is_some_and(|min| number < min) || maximum.is_some_and(|max| number > max)
                {
                    return Err(violation(format!("{number} is out of range")));
                }
                Ok(())
            }
            Self::Array { items, .. } => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| violation(format!("expected array, found {}", kind_of(value))))?;
                elements
                    .iter()
                    .enumerate()
                    .try_for_each(|(index, element)| {
                        items.validate_at(element, &format!("{path}[{index}]"))
                    })
            }
            Self::Object { properties, .. } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| violation(format!("expected object, found {}", kind_of(value))))?;
                for property in properties {
                    match object.get(property.name) {
                        None | Some(Value::Null) if property.required => {
                            return Err(violation(format!(
                                "missing required field `{}`",
                                property.name
                            )));
                        }
                        None | Some(Value::Null) => {}
                        Some(field) => property
                            .schema
                            .validate_at(field, &format!("{path}.{}", property.name))?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// A real date written exactly as `YYYY-MM-DD`: four-digit year, zero-padded
/// month and day, no sign.
fn is_calendar_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == text)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITIES: &[&str] = &["High", "Medium", "Low"];

    fn alert_schema() -> Schema {
        Schema::array(Schema::object(vec![
            Property::required("id", Schema::string()),
            Property::required("priority", Schema::one_of(PRIORITIES)),
            Property::required("due", Schema::date()),
            Property::optional("score", Schema::number_between(0.0, 100.0)),
        ]))
    }

    #[test]
    fn renders_json_schema() {
        let rendered = alert_schema().to_json_schema();
        assert_eq!(
            rendered,
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "priority": { "type": "string", "enum": ["High", "Medium", "Low"] },
                        "due": {
                            "type": "string",
                            "format": "date",
                            "description": "Date in YYYY-MM-DD format"
                        },
                        "score": { "type": "number", "minimum": 0.0, "maximum": 100.0 }
                    },
                    "required": ["id", "priority", "due"],
                    "propertyOrdering": ["id", "priority", "due", "score"]
                }
            })
        );
    }

    #[test]
    fn accepts_conforming_value_with_extra_fields() {
        let value = json!([
            { "id": "a1", "priority": "High", "due": "2025-07-01", "note": "extra" },
            { "id": "a2", "priority": "Low", "due": "2025-07-02", "score": 12 }
        ]);
        assert_eq!(alert_schema().validate(&value), Ok(()));
    }

    #[test]
    fn reports_missing_required_field_with_path() {
        let value = json!([
            { "id": "a1", "priority": "High", "due": "2025-07-01" },
            { "id": "a2", "due": "2025-07-01" }
        ]);
        let violation = alert_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$[1]");
        assert_eq!(violation.reason, "missing required field `priority`");
    }

    #[test]
    fn rejects_values_outside_closed_set() {
        let value = json!([{ "id": "a1", "priority": "Urgent", "due": "2025-07-01" }]);
        let violation = alert_schema().validate(&value).unwrap_err();
        assert_eq!(violation.path, "$[0].priority");
    }

    #[test]
    fn rejects_malformed_dates_and_wrong_types() {
        let bad_date = json!([{ "id": "a1", "priority": "Low", "due": "01/07/2025" }]);
        assert_eq!(
            alert_schema().validate(&bad_date).unwrap_err().path,
            "$[0].due"
        );

        let bad_score = json!([{ "id": "a1", "priority": "Low", "due": "2025-07-01", "score": "9" }]);
        let violation = alert_schema().validate(&bad_score).unwrap_err();
        assert_eq!(violation.path, "$[0].score");
        assert_eq!(violation.reason, "expected number, found string");

        let out_of_range =
            json!([{ "id": "a1", "priority": "Low", "due": "2025-07-01", "score": 140 }]);
        assert_eq!(
            alert_schema().validate(&out_of_range).unwrap_err().reason,
            "140 is out of range"
        );
    }

    #[test]
    fn dates_must_be_zero_padded_with_four_digit_years() {
        for accepted in ["2025-07-01", "2024-02-29"] {
            assert_eq!(Schema::date().validate(&json!(accepted)), Ok(()), "{accepted}");
        }
        for rejected in ["2025-7-1", "25-07-01", "+2025-07-01", "2025-02-30", "2025-07-01T00:00"] {
            let violation = Schema::date().validate(&json!(rejected)).unwrap_err();
            assert_eq!(violation.reason, format!("`{rejected}` is not a YYYY-MM-DD date"));
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let value = json!([{ "id": null, "priority": "Low", "due": "2025-07-01" }]);
        assert_eq!(
            alert_schema().validate(&value).unwrap_err().reason,
            "missing required field `id`"
        );
    }
}
