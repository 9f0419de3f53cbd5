use crate::{AdvisoryError, AdvisoryResult, RequestKind, ServiceErrorKind};
use opentelemetry::trace::Status;
use std::future::Future;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct RequestSpan {
    span: Span,
}

impl RequestSpan {
    pub fn new(kind: RequestKind) -> Self {
        let span = info_span!("krishi_advisor.request");
        span.set_attribute("gen_ai.operation.name", "advise");
        span.set_attribute("krishi_advisor.request.kind", kind.as_str());
        Self { span }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_error(&self, error: &AdvisoryError) {
        self.span
            .set_attribute("exception.message", error.to_string());
        let error_type = match error.service_kind() {
            None => "unavailable",
            Some(ServiceErrorKind::Transport) => "transport",
            Some(ServiceErrorKind::Reported) => "reported",
            Some(ServiceErrorKind::Malformed) => "malformed",
        };
        self.span.set_attribute("error.type", error_type);
        self.span.set_status(Status::error(error.to_string()));
    }
}

/// Run one mediator operation inside a `krishi_advisor.request` span.
pub async fn trace_request<T, Fut>(kind: RequestKind, future: Fut) -> AdvisoryResult<T>
where
    Fut: Future<Output = AdvisoryResult<T>>,
{
    let request_span = RequestSpan::new(kind);
    let result = future.instrument(request_span.span()).await;
    if let Err(error) = &result {
        request_span.on_error(error);
    }
    result
}
