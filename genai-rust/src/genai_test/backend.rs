use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    errors::{BackendError, BackendResult},
    GenerateRequest, GenerateResponse, GenerativeBackend,
};

/// Result for a mocked `generate` call.
/// It can either be a full response or an error to return.
pub enum MockGenerateResult {
    Response(GenerateResponse),
    Error(BackendError),
}

impl MockGenerateResult {
    /// Construct a result that yields the provided response.
    pub fn response(response: GenerateResponse) -> Self {
        Self::Response(response)
    }

    /// Construct a result whose response text is `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Response(GenerateResponse::text(text))
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: BackendError) -> Self {
        Self::Error(error)
    }
}

impl From<GenerateResponse> for MockGenerateResult {
    fn from(response: GenerateResponse) -> Self {
        Self::response(response)
    }
}

impl From<BackendResult<GenerateResponse>> for MockGenerateResult {
    fn from(result: BackendResult<GenerateResponse>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

type Responder = dyn Fn(&GenerateRequest) -> MockGenerateResult + Send + Sync;

#[derive(Default)]
struct MockBackendState {
    mocked_results: VecDeque<MockGenerateResult>,
    tracked_requests: Vec<GenerateRequest>,
}

/// A mock backend that tracks requests and yields predefined outputs.
///
/// Enqueued results are consumed first, in order. Once the queue is empty the
/// responder, if any, answers based on the request.
pub struct MockBackend {
    provider: &'static str,
    responder: Option<Arc<Responder>>,
    state: Mutex<MockBackendState>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            provider: "mock",
            responder: None,
            state: Mutex::new(MockBackendState::default()),
        }
    }
}

impl MockBackend {
    /// Construct a new mock backend instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a mock that answers every request with `responder`.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&GenerateRequest) -> MockGenerateResult + Send + Sync + 'static,
    {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::default()
        }
    }

    /// Enqueue one or more mocked generate results.
    pub fn enqueue_generate_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.extend(results);
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked generate result.
    pub fn enqueue_generate<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        self.enqueue_generate_results(std::iter::once(result.into()))
    }

    /// Retrieve the tracked requests accumulated so far.
    pub fn tracked_requests(&self) -> Vec<GenerateRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }

    /// Number of `generate` calls received.
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.len()
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for MockBackend {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, request: GenerateRequest) -> BackendResult<GenerateResponse> {
        let queued = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.tracked_requests.push(request.clone());
            state.mocked_results.pop_front()
        };

        let result = match (queued, &self.responder) {
            (Some(result), _) => result,
            (None, Some(responder)) => responder(&request),
            (None, None) => {
                return Err(BackendError::Invariant(
                    self.provider,
                    "no mocked generate results available".into(),
                ))
            }
        };

        match result {
            MockGenerateResult::Response(response) => Ok(response),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
