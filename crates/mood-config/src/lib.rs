//! # mood-config
//!
//! Layered configuration loading for moodtask using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MOODTASK_*` prefix, `__` as separator)
//! 2. An explicit file passed by the caller (e.g. `--config`)
//! 3. Project-level `.moodtask/config.toml`
//! 4. User-level `~/.config/moodtask/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MOODTASK_API__BASE_URL` -> `api.base_url`,
//! `MOODTASK_CAMERA__SOURCE` -> `camera.source`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use mood_config::MoodConfig;
//!
//! let config = MoodConfig::load_with_dotenv(None).expect("config");
//! println!("analysis service: {}", config.api.base_url);
//! ```

mod api;
mod camera;
mod error;

pub use api::ApiConfig;
pub use camera::{CameraConfig, CameraSource};
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MoodConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl MoodConfig {
    /// Load configuration from all sources and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if the merged values fail validation.
    pub fn load(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(extra).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory, if one exists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(extra)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can extract from it directly or layer more providers.
    #[must_use]
    pub fn figment(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".moodtask/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("MOODTASK_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.camera.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moodtask").join("config.toml"))
    }
}
