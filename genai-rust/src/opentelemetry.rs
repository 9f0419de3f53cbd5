use crate::{BackendResult, GenerateRequest, GenerateResponse, ModelUsage};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct GenerateSpan {
    span: Span,
    usage: Option<ModelUsage>,
    start_time: Instant,
    temperature: Option<f64>,
    top_p: Option<f64>,
    structured: bool,
}

impl GenerateSpan {
    pub fn new(provider: &str, request: &GenerateRequest) -> Self {
        let span = info_span!("krishi_genai.generate");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", request.model.clone());

        Self {
            span,
            usage: None,
            start_time: Instant::now(),
            temperature: request.temperature,
            top_p: request.top_p,
            structured: request.response_schema.is_some(),
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_response(&mut self, response: &GenerateResponse) {
        if let Some(usage) = &response.usage {
            self.usage = Some(usage.clone());
        }
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    fn on_end(&mut self) {
        if let Some(usage) = &self.usage {
            self.span
                .set_attribute("gen_ai.usage.input_tokens", i64::from(usage.input_tokens));
            self.span
                .set_attribute("gen_ai.usage.output_tokens", i64::from(usage.output_tokens));
        }
        if let Some(temperature) = self.temperature {
            self.span
                .set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(top_p) = self.top_p {
            self.span.set_attribute("gen_ai.request.top_p", top_p);
        }
        let output_type = if self.structured { "json" } else { "text" };
        self.span.set_attribute("gen_ai.output.type", output_type);
        self.span.set_attribute(
            "krishi_genai.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for GenerateSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run a `generate` call inside a span carrying `gen_ai.*` attributes.
pub async fn trace_generate<F, Fut>(
    provider: &str,
    request: GenerateRequest,
    f: F,
) -> BackendResult<GenerateResponse>
where
    F: FnOnce(GenerateRequest) -> Fut,
    Fut: std::future::Future<Output = BackendResult<GenerateResponse>>,
{
    let mut span = GenerateSpan::new(provider, &request);
    let result = span.instrument_future(f(request)).await;

    match &result {
        Ok(response) => span.on_response(response),
        Err(error) => span.on_error(error),
    }

    result
}
