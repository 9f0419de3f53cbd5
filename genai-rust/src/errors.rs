use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the provider was unexpected. (e.g. no candidate
    /// returned for a `generateContent` call)
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// The provider refused to generate content for the prompt (safety
    /// filters, blocklists, prohibited content).
    #[error("Blocked: {0}")]
    Blocked(String),
}

pub type BackendResult<T> = Result<T, BackendError>;
