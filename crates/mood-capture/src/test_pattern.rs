//! Synthetic capture backend.
//!
//! Produces a moving gradient at the requested resolution. Knobs cover the
//! device behaviours the workflow has to survive: refused access, slow
//! metadata, and devices that never report a usable size.

use image::{Rgba, RgbaImage};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::{CameraBackend, FrameSize, LiveStream, StreamRequest, check_surface};
use crate::error::CaptureError;

#[derive(Debug, Clone, Default)]
pub struct TestPatternCamera {
    natural_size: Option<FrameSize>,
    warmup: Duration,
    denied: Arc<AtomicBool>,
    open_streams: Arc<AtomicUsize>,
}

impl TestPatternCamera {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose every open is refused, as when the user denies access.
    #[must_use]
    pub fn denied() -> Self {
        let camera = Self::default();
        camera.set_denied(true);
        camera
    }

    /// Grant or revoke access for later opens. Shared with clones.
    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    /// Report `size` instead of the requested resolution.
    #[must_use]
    pub fn with_natural_size(mut self, size: FrameSize) -> Self {
        self.natural_size = Some(size);
        self
    }

    /// Delay the metadata signal by `warmup` after each open.
    #[must_use]
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// Streams opened from this backend (or its clones) and not yet released.
    #[must_use]
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

impl CameraBackend for TestPatternCamera {
    type Stream = TestPatternStream;

    async fn open(&self, request: StreamRequest) -> Result<Self::Stream, CaptureError> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceUnavailable(
                "permission to use the camera was denied".to_string(),
            ));
        }

        let size = self.natural_size.unwrap_or(request.resolution);
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);

        let warmup = if self.warmup.is_zero() {
            tx.send_replace(Some(size));
            None
        } else {
            let tx = Arc::clone(&tx);
            let delay = self.warmup;
            Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                tx.send_replace(Some(size));
            }))
        };

        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Ok(TestPatternStream {
            size,
            signal: Some(tx),
            metadata: rx,
            warmup,
            tick: 0,
            open_streams: Some(Arc::clone(&self.open_streams)),
        })
    }
}

pub struct TestPatternStream {
    size: FrameSize,
    signal: Option<Arc<watch::Sender<Option<FrameSize>>>>,
    metadata: watch::Receiver<Option<FrameSize>>,
    warmup: Option<JoinHandle<()>>,
    tick: u8,
    open_streams: Option<Arc<AtomicUsize>>,
}

impl LiveStream for TestPatternStream {
    fn metadata(&self) -> watch::Receiver<Option<FrameSize>> {
        self.metadata.clone()
    }

    fn render(&mut self, surface: &mut RgbaImage) -> Result<(), CaptureError> {
        if self.signal.is_none() {
            return Err(CaptureError::StreamNotReady("stream was released".to_string()));
        }
        check_surface(surface, self.size)?;

        let (width, height) = (self.size.width.max(1), self.size.height.max(1));
        let tick = self.tick;
        for (x, y, pixel) in surface.enumerate_pixels_mut() {
            let r = u8::try_from(x * 255 / width).unwrap_or(u8::MAX);
            let g = u8::try_from(y * 255 / height).unwrap_or(u8::MAX);
            *pixel = Rgba([r, g, tick, 255]);
        }
        self.tick = self.tick.wrapping_add(8);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(task) = self.warmup.take() {
            task.abort();
        }
        self.signal = None;
        if let Some(counter) = self.open_streams.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for TestPatternStream {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn honors_requested_resolution() {
        let camera = TestPatternCamera::new();
        let stream = camera.open(StreamRequest::default()).await.unwrap();
        assert_eq!(*stream.metadata().borrow(), Some(FrameSize::new(640, 480)));
        assert_eq!(camera.open_streams(), 1);
    }

    #[tokio::test]
    async fn denied_camera_refuses_open() {
        let camera = TestPatternCamera::denied();
        let err = camera.open(StreamRequest::default()).await.err().unwrap();
        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
        assert_eq!(camera.open_streams(), 0);
    }

    #[tokio::test]
    async fn warmup_delays_metadata() {
        let camera = TestPatternCamera::new().with_warmup(Duration::from_millis(20));
        let stream = camera.open(StreamRequest::default()).await.unwrap();
        let mut rx = stream.metadata();
        assert!(rx.borrow().is_none());
        let size = *rx.wait_for(Option::is_some).await.unwrap();
        assert_eq!(size, Some(FrameSize::new(640, 480)));
    }

    #[tokio::test]
    async fn release_is_idempotent_and_closes_signal() {
        let camera = TestPatternCamera::new().with_warmup(Duration::from_secs(60));
        let mut stream = camera.open(StreamRequest::default()).await.unwrap();
        let mut rx = stream.metadata();
        stream.release();
        stream.release();
        assert_eq!(camera.open_streams(), 0);
        assert!(rx.wait_for(Option::is_some).await.is_err());
    }

    #[tokio::test]
    async fn render_rejects_wrong_surface() {
        let camera = TestPatternCamera::new();
        let mut stream = camera.open(StreamRequest::default()).await.unwrap();
        let mut surface = RgbaImage::new(10, 10);
        assert!(matches!(
            stream.render(&mut surface),
            Err(CaptureError::EncodingFailed(_))
        ));
    }
}
