//! Backend selection from configuration.

use image::RgbaImage;
use mood_capture::still_image::StillImageStream;
use mood_capture::test_pattern::TestPatternStream;
use mood_capture::{
    CameraBackend, CaptureError, FrameSize, LiveStream, StillImageCamera, StreamRequest,
    TestPatternCamera,
};
use mood_config::{CameraConfig, CameraSource};
use tokio::sync::watch;

/// Whichever built-in backend `[camera]` selects.
#[derive(Debug, Clone)]
pub enum ConfiguredCamera {
    TestPattern(TestPatternCamera),
    StillImage(StillImageCamera),
}

impl ConfiguredCamera {
    /// # Errors
    ///
    /// [`CaptureError::DeviceUnavailable`] for a still-image source with no path.
    pub fn from_config(config: &CameraConfig) -> Result<Self, CaptureError> {
        match config.source {
            CameraSource::TestPattern => Ok(Self::TestPattern(TestPatternCamera::new())),
            CameraSource::StillImage => config
                .image_path()
                .map(|path| Self::StillImage(StillImageCamera::new(path)))
                .ok_or_else(|| {
                    CaptureError::DeviceUnavailable("camera.image_path is not set".to_string())
                }),
        }
    }
}

/// The resolution `[camera]` asks for.
#[must_use]
pub const fn stream_request(config: &CameraConfig) -> StreamRequest {
    StreamRequest {
        resolution: FrameSize::new(config.width, config.height),
    }
}

impl CameraBackend for ConfiguredCamera {
    type Stream = ConfiguredStream;

    async fn open(&self, request: StreamRequest) -> Result<Self::Stream, CaptureError> {
        match self {
            Self::TestPattern(camera) => {
                camera.open(request).await.map(ConfiguredStream::TestPattern)
            }
            Self::StillImage(camera) => {
                camera.open(request).await.map(ConfiguredStream::StillImage)
            }
        }
    }
}

pub enum ConfiguredStream {
    TestPattern(TestPatternStream),
    StillImage(StillImageStream),
}

impl LiveStream for ConfiguredStream {
    fn metadata(&self) -> watch::Receiver<Option<FrameSize>> {
        match self {
            Self::TestPattern(stream) => stream.metadata(),
            Self::StillImage(stream) => stream.metadata(),
        }
    }

    fn render(&mut self, surface: &mut RgbaImage) -> Result<(), CaptureError> {
        match self {
            Self::TestPattern(stream) => stream.render(surface),
            Self::StillImage(stream) => stream.render(surface),
        }
    }

    fn release(&mut self) {
        match self {
            Self::TestPattern(stream) => stream.release(),
            Self::StillImage(stream) => stream.release(),
        }
    }
}
