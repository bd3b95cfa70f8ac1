//! Workflow error types.

use mood_capture::CaptureError;
use mood_client::ApiError;
use thiserror::Error;

use crate::state::ErrorDomain;

/// Failures returned by [`crate::WorkflowController`] actions.
///
/// Every variant except [`Self::Busy`] and [`Self::Superseded`] is also
/// recorded in the state's error slot for its domain.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// An analyze cycle is already in flight; the request was ignored.
    #[error("an analysis is already in progress")]
    Busy,

    /// The session this action ran against was stopped or replaced.
    #[error("the capture session was stopped or replaced")]
    Superseded,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    /// Domain a failure is reported under when raised by an analyze cycle.
    #[must_use]
    pub const fn cycle_domain(&self) -> Option<ErrorDomain> {
        match self {
            Self::Busy | Self::Superseded => None,
            Self::Api(ApiError::Network(_)) => Some(ErrorDomain::Network),
            Self::Capture(_) | Self::Api(_) => Some(ErrorDomain::Analysis),
        }
    }
}
