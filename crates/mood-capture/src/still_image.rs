//! File-backed capture backend: serves one decoded image as a frozen stream.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

use crate::backend::{CameraBackend, FrameSize, LiveStream, StreamRequest, check_surface};
use crate::error::CaptureError;

#[derive(Debug, Clone)]
pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CameraBackend for StillImageCamera {
    type Stream = StillImageStream;

    async fn open(&self, request: StreamRequest) -> Result<Self::Stream, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            CaptureError::DeviceUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let path = self.path.clone();
        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| CaptureError::DeviceUnavailable(format!("decoder task failed: {e}")))?
            .map_err(|e| {
                CaptureError::DeviceUnavailable(format!("cannot decode {}: {e}", path.display()))
            })?
            .to_rgba8();

        let size = FrameSize::new(image.width(), image.height());
        if size != request.resolution {
            tracing::debug!(
                requested = %request.resolution,
                natural = %size,
                "still image ignores requested resolution"
            );
        }

        let (tx, rx) = watch::channel(Some(size));
        Ok(StillImageStream {
            image,
            signal: Some(tx),
            metadata: rx,
        })
    }
}

pub struct StillImageStream {
    image: RgbaImage,
    signal: Option<watch::Sender<Option<FrameSize>>>,
    metadata: watch::Receiver<Option<FrameSize>>,
}

impl LiveStream for StillImageStream {
    fn metadata(&self) -> watch::Receiver<Option<FrameSize>> {
        self.metadata.clone()
    }

    fn render(&mut self, surface: &mut RgbaImage) -> Result<(), CaptureError> {
        if self.signal.is_none() {
            return Err(CaptureError::StreamNotReady("stream was released".to_string()));
        }
        check_surface(surface, FrameSize::new(self.image.width(), self.image.height()))?;
        surface.copy_from_slice(self.image.as_raw());
        Ok(())
    }

    fn release(&mut self) {
        self.signal = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let camera = StillImageCamera::new("/definitely/not/here.png");
        let err = camera.open(StreamRequest::default()).await.err().unwrap();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[tokio::test]
    async fn garbage_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = StillImageCamera::new(&path)
            .open(StreamRequest::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[tokio::test]
    async fn reports_file_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        RgbaImage::new(32, 24).save(&path).unwrap();

        let stream = StillImageCamera::new(&path)
            .open(StreamRequest::default())
            .await
            .unwrap();
        assert_eq!(*stream.metadata().borrow(), Some(FrameSize::new(32, 24)));
    }
}
