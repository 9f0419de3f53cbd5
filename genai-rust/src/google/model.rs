use super::api::{
    Blob, Content as GoogleContent, FinishReason, GenerateContentParameters,
    GenerateContentResponse, GenerationConfig, Part as GooglePart, UsageMetadata,
};
use crate::{
    client_utils, BackendError, BackendResult, Content, GenerateRequest, GenerateResponse,
    GenerativeBackend, ModelUsage, Part, Role,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "google";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` over the Generative Language REST API.
pub struct GoogleBackend {
    api_key: String,
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleBackendOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleBackend {
    #[must_use]
    pub fn new(options: GoogleBackendOptions) -> Self {
        let GoogleBackendOptions {
            api_key,
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            api_key,
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> BackendResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            BackendError::InvalidInput("Google API key is not a valid header value".to_string())
        })?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                BackendError::InvalidInput(format!("Invalid Google header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                BackendError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GoogleBackend {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, request: GenerateRequest) -> BackendResult<GenerateResponse> {
        crate::opentelemetry::trace_generate(self.provider(), request, |request| async move {
            let url = format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            );
            let params = convert_to_generate_content_parameters(request)?;

            let headers = self.request_headers()?;
            let response: GenerateContentResponse =
                client_utils::send_json(&self.client, &url, &params, headers).await?;

            map_google_response(response)
        })
        .await
    }
}

fn convert_to_generate_content_parameters(
    request: GenerateRequest,
) -> BackendResult<GenerateContentParameters> {
    if request.model.trim().is_empty() {
        return Err(BackendError::InvalidInput(
            "A model identifier is required".to_string(),
        ));
    }
    if request.contents.is_empty() {
        return Err(BackendError::InvalidInput(
            "At least one content turn is required".to_string(),
        ));
    }

    let mut config = GenerationConfig {
        temperature: request.temperature,
        top_p: request.top_p,
        ..Default::default()
    };

    if let Some(schema) = request.response_schema {
        config.response_mime_type = Some("application/json".to_string());
        config.response_json_schema = Some(schema);
    }

    let system_instruction = request.system_instruction.map(|text| GoogleContent {
        role: None,
        parts: Some(vec![GooglePart {
            text: Some(text),
            ..Default::default()
        }]),
    });

    Ok(GenerateContentParameters {
        contents: request
            .contents
            .into_iter()
            .map(convert_to_google_content)
            .collect(),
        system_instruction,
        generation_config: Some(config),
    })
}

fn convert_to_google_content(content: Content) -> GoogleContent {
    let role = match content.role {
        Role::User => "user",
        Role::Model => "model",
    };

    GoogleContent {
        role: Some(role.to_string()),
        parts: Some(
            content
                .parts
                .into_iter()
                .map(convert_to_google_part)
                .collect(),
        ),
    }
}

fn convert_to_google_part(part: Part) -> GooglePart {
    match part {
        Part::Text(text_part) => GooglePart {
            text: Some(text_part.text),
            ..Default::default()
        },
        Part::InlineData(inline_part) => GooglePart {
            inline_data: Some(Blob {
                mime_type: inline_part.mime_type,
                data: inline_part.data,
            }),
            ..Default::default()
        },
    }
}

fn map_google_response(response: GenerateContentResponse) -> BackendResult<GenerateResponse> {
    if let Some(block_reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
    {
        let message = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason_message.clone())
            .unwrap_or_else(|| format!("Prompt blocked: {block_reason}"));
        return Err(BackendError::Blocked(message));
    }

    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| {
            BackendError::Invariant(PROVIDER, "No candidate in response".to_string())
        })?;

    if let Some(reason) = candidate.finish_reason {
        if is_blocking_finish_reason(reason) {
            return Err(BackendError::Blocked(format!(
                "Generation stopped: {reason:?}"
            )));
        }
    }

    let text = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text)
        .collect::<String>();

    if text.is_empty() {
        return Err(BackendError::Invariant(
            PROVIDER,
            "Candidate has no text content".to_string(),
        ));
    }

    Ok(GenerateResponse {
        text,
        usage: response.usage_metadata.as_ref().map(map_google_usage_metadata),
    })
}

fn is_blocking_finish_reason(reason: FinishReason) -> bool {
    matches!(
        reason,
        FinishReason::Safety
            | FinishReason::Recitation
            | FinishReason::Blocklist
            | FinishReason::ProhibitedContent
            | FinishReason::Spii
            | FinishReason::ImageSafety
    )
}

fn map_google_usage_metadata(usage: &UsageMetadata) -> ModelUsage {
    ModelUsage {
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_with_schema() -> GenerateRequest {
        GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            contents: vec![Content::user(vec![Part::text(
                "Get the 5-day weather forecast for Mandya.",
            )])],
            response_schema: Some(json!({ "type": "object" })),
            ..Default::default()
        }
    }

    #[test]
    fn schema_sets_json_mime_type() {
        let params = convert_to_generate_content_parameters(request_with_schema()).unwrap();
        let body = serde_json::to_value(&params).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "Get the 5-day weather forecast for Mandya." }]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseJsonSchema": { "type": "object" }
                }
            })
        );
    }

    #[test]
    fn chat_request_carries_system_instruction_and_sampling() {
        let request = GenerateRequest {
            model: "gemini-2.5-flash-image".to_string(),
            system_instruction: Some("Be helpful.".to_string()),
            contents: vec![
                Content::model("Namaskara!"),
                Content::user(vec![
                    Part::inline_data("bGVhZg==", "image/png"),
                    Part::text("What is wrong with this leaf?"),
                ]),
            ],
            temperature: Some(0.7),
            top_p: Some(0.95),
            ..Default::default()
        };

        let body = serde_json::to_value(convert_to_generate_content_parameters(request).unwrap())
            .unwrap();

        assert_eq!(
            body["systemInstruction"],
            json!({ "parts": [{ "text": "Be helpful." }] })
        );
        assert_eq!(
            body["contents"][1]["parts"][0],
            json!({ "inlineData": { "mimeType": "image/png", "data": "bGVhZg==" } })
        );
        assert_eq!(body["generationConfig"]["temperature"], json!(0.7));
        assert_eq!(body["generationConfig"]["topP"], json!(0.95));
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn empty_contents_is_invalid_input() {
        let request = GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            convert_to_generate_content_parameters(request),
            Err(BackendError::InvalidInput(_))
        ));
    }

    #[test]
    fn response_text_skips_thoughts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "{\"location\":" },
                        { "text": "\"Mandya\"}" }
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 7 }
        }))
        .unwrap();

        let mapped = map_google_response(response).unwrap();
        assert_eq!(mapped.text, "{\"location\":\"Mandya\"}");
        assert_eq!(
            mapped.usage,
            Some(ModelUsage {
                input_tokens: 12,
                output_tokens: 7
            })
        );
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();

        match map_google_response(response) {
            Err(BackendError::Blocked(message)) => assert_eq!(message, "Prompt blocked: SAFETY"),
            other => panic!("expected blocked error, got {other:?}"),
        }
    }

    #[test]
    fn missing_candidate_is_invariant() {
        let response = GenerateContentResponse::default();
        assert!(matches!(
            map_google_response(response),
            Err(BackendError::Invariant("google", _))
        ));
    }

    #[test]
    fn unknown_finish_reason_still_parses() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }] },
                "finishReason": "SOMETHING_NEW"
            }]
        }))
        .unwrap();

        assert_eq!(map_google_response(response).unwrap().text, "ok");
    }

    fn backend_with_key(api_key: &str, base_url: &str) -> GoogleBackend {
        GoogleBackend::new(GoogleBackendOptions {
            api_key: api_key.to_string(),
            base_url: Some(base_url.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn api_key_travels_as_sensitive_header() {
        let headers = backend_with_key("SECRET-KEY-123", DEFAULT_BASE_URL)
            .request_headers()
            .unwrap();
        let api_key = headers.get(API_KEY_HEADER).unwrap();
        assert_eq!(api_key, "SECRET-KEY-123");
        assert!(api_key.is_sensitive());
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_the_api_key() {
        let backend = backend_with_key("SECRET-KEY-123", "http://127.0.0.1:9");
        let err = backend
            .generate(GenerateRequest {
                model: "m".to_string(),
                contents: vec![Content::user(vec![Part::text("hi")])],
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Transport(_)));
        let rendered = format!("{err} {err:?}");
        assert!(!rendered.contains("SECRET-KEY-123"), "{rendered}");
        assert!(!rendered.contains("generateContent"), "{rendered}");
    }
}
