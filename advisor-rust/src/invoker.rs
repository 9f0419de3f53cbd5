//! Schema-constrained invocation of the generative backend.
//!
//! The backend handle is created lazily, at most once per [`Invoker`], by a
//! [`BackendConnector`]. A connector that cannot produce a backend (no
//! credential) is remembered as such: every later call short-circuits with
//! [`AdvisoryError::Unavailable`] without touching the network.

use crate::{schema::Schema, AdvisoryError, AdvisoryResult, RequestKind};
use krishi_genai::{
    google::{GoogleBackend, GoogleBackendOptions},
    Content, GenerateRequest, GenerativeBackend, Part,
};
use std::{env, fmt, sync::Arc};
use tokio::sync::OnceCell;
use tracing::{debug, error};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Produces the backend handle on first use. Returning `None` means the
/// service is not configured.
pub trait BackendConnector: Send + Sync {
    fn connect(&self) -> Option<Arc<dyn GenerativeBackend>>;
}

/// Where the API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Read from the named environment variable when the backend is first
    /// needed.
    Env(String),
    Static(Option<String>),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Env(DEFAULT_API_KEY_VAR.to_string())
    }
}

impl CredentialSource {
    /// The configured key, if any. Blank values count as missing.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        let raw = match self {
            Self::Env(var) => env::var(var).ok(),
            Self::Static(value) => value.clone(),
        };
        raw.map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Connects to Gemini once a credential can be resolved.
#[derive(Clone, Default)]
pub struct GoogleConnector {
    credentials: CredentialSource,
    options: GoogleBackendOptions,
}

impl GoogleConnector {
    /// `options.api_key` is ignored; the key always comes from `credentials`.
    #[must_use]
    pub fn new(credentials: CredentialSource, options: GoogleBackendOptions) -> Self {
        Self {
            credentials,
            options,
        }
    }
}

impl BackendConnector for GoogleConnector {
    fn connect(&self) -> Option<Arc<dyn GenerativeBackend>> {
        let Some(api_key) = self.credentials.resolve() else {
            error!(source = ?self.credentials, "no API key configured for the AI service");
            return None;
        };
        Some(Arc::new(GoogleBackend::new(GoogleBackendOptions {
            api_key,
            ..self.options.clone()
        })))
    }
}

/// Hands out a backend constructed elsewhere, or none at all.
#[derive(Clone, Default)]
pub struct FixedConnector {
    backend: Option<Arc<dyn GenerativeBackend>>,
}

impl FixedConnector {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A connector for an unconfigured service.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { backend: None }
    }
}

impl BackendConnector for FixedConnector {
    fn connect(&self) -> Option<Arc<dyn GenerativeBackend>> {
        self.backend.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    Text,
    /// Needed whenever an image is part of the request.
    Vision,
}

impl ModelVariant {
    #[must_use]
    pub fn of(request: &GenerateRequest) -> Self {
        if request.has_inline_data() {
            Self::Vision
        } else {
            Self::Text
        }
    }
}

/// Model ids per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub text: String,
    pub vision: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            vision: DEFAULT_VISION_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Defaults, overridden by `KRISHI_TEXT_MODEL` and `KRISHI_VISION_MODEL`
    /// when set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |var: &str, fallback: String| {
            env::var(var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
        };
        Self {
            text: read("KRISHI_TEXT_MODEL", defaults.text),
            vision: read("KRISHI_VISION_MODEL", defaults.vision),
        }
    }

    #[must_use]
    pub fn model_for(&self, variant: ModelVariant) -> &str {
        match variant {
            ModelVariant::Text => &self.text,
            ModelVariant::Vision => &self.vision,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sampling {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl Sampling {
    pub const CHAT: Self = Self {
        temperature: Some(0.7),
        top_p: Some(0.95),
    };
}

/// One fully rendered request, ready to send.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub kind: RequestKind,
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    /// Declared answer shape. `None` means free text.
    pub response_schema: Option<Schema>,
    pub sampling: Sampling,
}

impl Invocation {
    /// A single-turn request whose answer must match `schema`.
    #[must_use]
    pub fn structured(kind: RequestKind, prompt: String, schema: Schema) -> Self {
        Self {
            kind,
            system_instruction: None,
            contents: vec![Content::user(vec![Part::text(prompt)])],
            response_schema: Some(schema),
            sampling: Sampling::default(),
        }
    }

    /// A free-text chat request.
    #[must_use]
    pub fn chat(system_instruction: String, contents: Vec<Content>) -> Self {
        Self {
            kind: RequestKind::Chat,
            system_instruction: Some(system_instruction),
            contents,
            response_schema: None,
            sampling: Sampling::CHAT,
        }
    }

    /// The backend request, addressed to the model variant its parts need.
    #[must_use]
    pub fn into_request(self, models: &ModelConfig) -> GenerateRequest {
        let mut request = GenerateRequest {
            model: String::new(),
            system_instruction: self.system_instruction,
            contents: self.contents,
            response_schema: self.response_schema.as_ref().map(Schema::to_json_schema),
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
        };
        request.model = models.model_for(ModelVariant::of(&request)).to_string();
        request
    }
}

pub struct Invoker {
    connector: Box<dyn BackendConnector>,
    backend: OnceCell<Option<Arc<dyn GenerativeBackend>>>,
    models: ModelConfig,
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("initialized", &self.backend.initialized())
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl Invoker {
    #[must_use]
    pub fn new(connector: Box<dyn BackendConnector>, models: ModelConfig) -> Self {
        Self {
            connector,
            backend: OnceCell::new(),
            models,
        }
    }

    async fn backend(&self) -> Option<&Arc<dyn GenerativeBackend>> {
        self.backend
            .get_or_init(|| async { self.connector.connect() })
            .await
            .as_ref()
    }

    /// Send `invocation` and return the backend's raw text unchanged.
    pub async fn invoke(&self, invocation: Invocation) -> AdvisoryResult<String> {
        let Some(backend) = self.backend().await else {
            return Err(AdvisoryError::Unavailable);
        };

        let kind = invocation.kind;
        let request = invocation.into_request(&self.models);
        let model = request.model.clone();

        debug!(kind = %kind, model = %model, provider = backend.provider(), "dispatching request");

        match backend.generate(request).await {
            Ok(response) => Ok(response.text),
            Err(err) => {
                error!(kind = %kind, model = %model, error = %err, "AI service request failed");
                Err(AdvisoryError::transport(kind.failure_message()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credentials_ignore_blank_values() {
        assert_eq!(CredentialSource::Static(None).resolve(), None);
        assert_eq!(
            CredentialSource::Static(Some("   ".to_string())).resolve(),
            None
        );
        assert_eq!(
            CredentialSource::Static(Some(" key-123\n".to_string())).resolve(),
            Some("key-123".to_string())
        );
    }

    #[test]
    fn env_credentials_of_unset_var_are_missing() {
        let source = CredentialSource::Env("KRISHI_TEST_SURELY_UNSET_VAR".to_string());
        assert_eq!(source.resolve(), None);
        assert!(GoogleConnector::new(source, GoogleBackendOptions::default())
            .connect()
            .is_none());
    }

    #[test]
    fn image_parts_select_the_vision_model() {
        let models = ModelConfig::default();
        let text_only = Invocation::chat(
            "system".to_string(),
            vec![Content::user(vec![Part::text("hi")])],
        )
        .into_request(&models);
        assert_eq!(ModelVariant::of(&text_only), ModelVariant::Text);
        assert_eq!(text_only.model, "gemini-2.5-flash");
        assert_eq!(text_only.temperature, Some(0.7));

        let with_image = Invocation::chat(
            "system".to_string(),
            vec![Content::user(vec![
                Part::inline_data("AAAA", "image/png"),
                Part::text("what is this?"),
            ])],
        )
        .into_request(&models);
        assert_eq!(ModelVariant::of(&with_image), ModelVariant::Vision);
        assert_eq!(with_image.model, "gemini-2.5-flash-image");
    }

    #[test]
    fn structured_invocations_use_backend_sampling_defaults() {
        let invocation = Invocation::structured(
            RequestKind::Weather,
            "Get the 5-day weather forecast for Mandya.".to_string(),
            Schema::string(),
        );
        assert_eq!(invocation.sampling, Sampling::default());
        assert_eq!(invocation.system_instruction, None);
        assert!(invocation.response_schema.is_some());
    }
}
