//! Client error types.

use mood_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the analysis or task service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response: connection refused, reset, or timed out.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    ///
    /// `message` is the service's `detail` when it sent one, otherwise a
    /// fallback chosen by the call site.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code returned by the service.
        status: u16,
        /// Human-readable failure reason.
        message: String,
    },

    /// A success response whose body does not match the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request was rejected locally before anything was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

impl ApiError {
    /// Whether the failure happened below HTTP (no response at all).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
