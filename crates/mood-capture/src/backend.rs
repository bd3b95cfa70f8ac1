//! Device backend seam.
//!
//! A [`CameraBackend`] hands out [`LiveStream`]s. Streams announce their
//! natural dimensions through a `watch` channel: `None` until the device has
//! produced metadata, then `Some(size)`. The channel closes once the stream
//! is released, which wakes any waiter with an error.

use image::RgbaImage;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tokio::sync::watch;

use crate::error::CaptureError;

/// Pixel dimensions of a stream or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both axes non-zero.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What the caller asks the device for. Devices may deliver a different
/// natural size; the stream's metadata is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub resolution: FrameSize,
}

impl Default for StreamRequest {
    fn default() -> Self {
        Self {
            resolution: FrameSize::new(640, 480),
        }
    }
}

/// An open, exclusive stream from a capture device.
pub trait LiveStream: Send + 'static {
    /// Subscribe to the stream's natural dimensions.
    fn metadata(&self) -> watch::Receiver<Option<FrameSize>>;

    /// Draw the current frame into `surface`, which the caller sized to the
    /// stream's natural dimensions.
    ///
    /// # Errors
    ///
    /// [`CaptureError::StreamNotReady`] once the stream is released,
    /// [`CaptureError::EncodingFailed`] if `surface` has the wrong size.
    fn render(&mut self, surface: &mut RgbaImage) -> Result<(), CaptureError>;

    /// Give the device back. Idempotent.
    fn release(&mut self);
}

/// Something that can grant exclusive access to a capture device.
pub trait CameraBackend: Send + Sync + 'static {
    type Stream: LiveStream;

    /// Request the device.
    ///
    /// # Errors
    ///
    /// [`CaptureError::DeviceUnavailable`] when permission is denied, no
    /// device exists, or it is held elsewhere.
    fn open(
        &self,
        request: StreamRequest,
    ) -> impl Future<Output = Result<Self::Stream, CaptureError>> + Send;
}

/// Reject a surface whose size differs from the stream's.
pub(crate) fn check_surface(surface: &RgbaImage, expected: FrameSize) -> Result<(), CaptureError> {
    if surface.dimensions() == (expected.width, expected.height) {
        Ok(())
    } else {
        Err(CaptureError::EncodingFailed(format!(
            "surface is {}x{}, stream is {expected}",
            surface.width(),
            surface.height()
        )))
    }
}
