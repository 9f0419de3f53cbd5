use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The producer of a piece of content in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A part of a content turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Part {
    Text(TextPart),
    InlineData(InlineDataPart),
}

/// A part of a content turn that contains text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    pub text: String,
}

/// Binary data sent inline with the request, such as a photo of a leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineDataPart {
    /// The IANA media type of the data, e.g. `image/jpeg`.
    pub mime_type: String,
    /// The data, base64 encoded.
    pub data: String,
}

/// One turn of the conversation sent to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

/// A JSON schema document describing the expected output shape.
pub type JSONSchema = Value;

/// Input for a single `generate` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// Identifier of the model variant to run, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Instruction steering the model for the whole conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Ordered conversation turns. The last turn is the one being answered.
    pub contents: Vec<Content>,
    /// When set, the model is constrained to emit JSON matching this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<JSONSchema>,
    /// Amount of randomness injected into the response. Ranges from 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold: the model considers the tokens with
    /// `top_p` probability mass. Ranges from 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Output of a `generate` call: the text the model produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,
}
