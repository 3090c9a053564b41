//! Remote fetch errors

use reqwest::StatusCode;
use thiserror::Error;

/// Failure category surfaced to the view
///
/// The engine does not tell timeouts, transport faults and server errors
/// apart: every remote failure is `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote list could not be fetched
    Network,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network error"),
        }
    }
}

/// Errors produced by a [`RemoteSource`](super::RemoteSource)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or timeout
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not a singer list
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Source-specific failure (used by non-HTTP sources)
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Category shown to the view
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Network
    }

    /// Whether the failure looks like a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}

/// Result type for remote fetches
pub type FetchResult<T> = Result<T, FetchError>;
