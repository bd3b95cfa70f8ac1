//! Still-frame extraction.
//!
//! Capture is split in two so callers holding a lock on the session only
//! hold it for the cheap part: [`grab_raster`] copies the current frame off
//! the stream, [`encode_png`] compresses it on the blocking pool.

use image::{ImageFormat, RgbaImage};
use serde::Serialize;
use std::io::Cursor;

use crate::backend::{FrameSize, LiveStream};
use crate::error::CaptureError;
use crate::session::DeviceSession;

/// A single PNG-encoded still taken from a live stream.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    size: FrameSize,
    png: Vec<u8>,
}

impl CapturedFrame {
    #[must_use]
    pub const fn size(&self) -> FrameSize {
        self.size
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height
    }

    /// Encoded PNG bytes.
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    #[must_use]
    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// Summary without the payload, for status reporting.
    #[must_use]
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            width: self.size.width,
            height: self.size.height,
            encoded_bytes: self.png.len(),
        }
    }
}

impl std::fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedFrame")
            .field("size", &self.size)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

/// Dimensions and payload size of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub width: u32,
    pub height: u32,
    pub encoded_bytes: usize,
}

/// Copy the stream's current frame onto a surface of its natural size.
///
/// # Errors
///
/// - [`CaptureError::StreamNotReady`] if the session is not marked ready.
/// - [`CaptureError::EncodingFailed`] if the natural size has a zero axis.
pub fn grab_raster<S: LiveStream>(
    session: &mut DeviceSession<S>,
) -> Result<RgbaImage, CaptureError> {
    if !session.is_ready() {
        return Err(CaptureError::StreamNotReady(
            "device has not reported usable dimensions".to_string(),
        ));
    }

    let size = session.natural_size().ok_or_else(|| {
        CaptureError::StreamNotReady("stream metadata is gone".to_string())
    })?;
    if !size.is_usable() {
        return Err(CaptureError::EncodingFailed(format!(
            "cannot build a {size} surface"
        )));
    }

    let mut surface = RgbaImage::new(size.width, size.height);
    session.stream_mut().render(&mut surface)?;
    Ok(surface)
}

/// Encode a raster as PNG on the blocking pool.
///
/// # Errors
///
/// [`CaptureError::EncodingFailed`] if the raster is empty, the encoder
/// fails, or it produces no bytes.
pub async fn encode_png(raster: RgbaImage) -> Result<CapturedFrame, CaptureError> {
    let size = FrameSize::new(raster.width(), raster.height());
    if !size.is_usable() {
        return Err(CaptureError::EncodingFailed(format!(
            "cannot encode a {size} surface"
        )));
    }

    let png = tokio::task::spawn_blocking(move || {
        let mut png = Vec::new();
        raster.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok::<_, image::ImageError>(png)
    })
    .await
    .map_err(|e| CaptureError::EncodingFailed(format!("encoder task failed: {e}")))?
    .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    if png.is_empty() {
        return Err(CaptureError::EncodingFailed(
            "encoder produced no payload".to_string(),
        ));
    }

    tracing::debug!(%size, bytes = png.len(), "frame encoded");
    Ok(CapturedFrame { size, png })
}

/// Grab and encode in one step.
///
/// # Errors
///
/// See [`grab_raster`] and [`encode_png`].
pub async fn capture_frame<S: LiveStream>(
    session: &mut DeviceSession<S>,
) -> Result<CapturedFrame, CaptureError> {
    let raster = grab_raster(session)?;
    encode_png(raster).await
}
