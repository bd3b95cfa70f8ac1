//! Capture device configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const fn default_width() -> u32 {
    640
}

const fn default_height() -> u32 {
    480
}

const fn default_ready_timeout_secs() -> u64 {
    5
}

/// Which capture backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSource {
    /// Synthetic frames generated at the requested resolution.
    #[default]
    TestPattern,
    /// A still image on disk served as a frozen stream.
    StillImage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Requested frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Requested frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub source: CameraSource,

    /// Image file served when `source = "still_image"`.
    #[serde(default)]
    pub image_path: String,

    /// How long to wait for the stream to report usable dimensions.
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            source: CameraSource::default(),
            image_path: String::new(),
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

impl CameraConfig {
    #[must_use]
    pub const fn ready_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ready_timeout_secs)
    }

    /// The still image path, if one is configured.
    #[must_use]
    pub fn image_path(&self) -> Option<PathBuf> {
        (!self.image_path.is_empty()).then(|| PathBuf::from(&self.image_path))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::invalid(
                "camera.width/camera.height",
                "resolution must be non-zero in both axes",
            ));
        }
        if self.ready_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "camera.ready_timeout_secs",
                "must be at least 1",
            ));
        }
        if self.source == CameraSource::StillImage && self.image_path.is_empty() {
            return Err(ConfigError::invalid(
                "camera.image_path",
                "required when camera.source is still_image",
            ));
        }
        Ok(())
    }
}
