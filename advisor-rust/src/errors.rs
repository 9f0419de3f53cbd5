use crate::RequestKind;
use thiserror::Error;

/// Message shown when no credential is configured for the generative service.
pub const UNAVAILABLE_MESSAGE: &str = "AI service is not configured. An API key is required.";

/// The only errors that cross the mediator boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// No credential is configured, so no backend client exists. Detected
    /// before any network attempt and never retried.
    #[error("AI service is not configured. An API key is required.")]
    Unavailable,
    /// The backend was reachable in principle but the request did not yield a
    /// usable result. `message` is safe to show to the user.
    #[error("{message}")]
    Service {
        kind: ServiceErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The call to the backend failed (network, status code, blocked prompt).
    Transport,
    /// The backend answered with its own `error` field.
    Reported,
    /// The answer was not parseable or did not match the declared schema.
    Malformed,
}

impl AdvisoryError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Service {
            kind: ServiceErrorKind::Transport,
            message: message.into(),
        }
    }

    pub(crate) fn reported(message: impl Into<String>) -> Self {
        Self::Service {
            kind: ServiceErrorKind::Reported,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(kind: RequestKind) -> Self {
        Self::Service {
            kind: ServiceErrorKind::Malformed,
            message: format!(
                "Could not parse {} data returned by the AI service.",
                kind.label()
            ),
        }
    }

    #[must_use]
    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            Self::Unavailable => None,
            Self::Service { kind, .. } => Some(*kind),
        }
    }
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

/// Reasons a farmer profile is rejected by [`FarmerProfile::validate`](crate::FarmerProfile::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Profile field `{0}` must not be empty")]
    MissingField(&'static str),
    #[error("Land size must be a positive number of acres")]
    InvalidLandSize,
}

/// Reasons an activity record cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("Please enter some notes for the activity.")]
    EmptyNotes,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value under `{key}` is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
