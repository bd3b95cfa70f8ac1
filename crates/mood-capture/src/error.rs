//! Capture error types.

use thiserror::Error;

/// Errors raised while acquiring a device or extracting a frame from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The device could not be acquired (permission denied, missing, busy).
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Capture was attempted before the stream reported usable dimensions,
    /// or after its session was released.
    #[error("stream not ready: {0}")]
    StreamNotReady(String),

    /// The raster surface could not be built or the encoder produced nothing.
    #[error("frame encoding failed: {0}")]
    EncodingFailed(String),
}
