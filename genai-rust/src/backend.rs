use crate::{BackendResult, GenerateRequest, GenerateResponse};

/// A generative content service.
///
/// One backend instance serves every model variant of its provider; the
/// variant is chosen per request through [`GenerateRequest::model`].
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn generate(&self, request: GenerateRequest) -> BackendResult<GenerateResponse>;
}
