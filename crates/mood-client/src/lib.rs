//! # mood-client
//!
//! HTTP clients for the remote services behind the mood-to-task workflow:
//! - emotion analysis of a captured still (`POST /analyze_face_emotion`)
//! - task suggestion for an emotion (`GET /tasks/suggestion`)
//! - task creation and listing (`POST /tasks`, `GET /tasks`)
//!
//! All endpoints share one [`ApiClient`], built from the `[api]` section of
//! the configuration.

pub mod analysis;
pub mod suggestion;
pub mod tasks;

mod error;
mod http;

#[cfg(feature = "test-support")]
pub mod mock;

pub use error::ApiError;

use mood_config::ApiConfig;
use std::time::Duration;

/// Client for the analysis and task service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout(), &config.user_agent)
    }

    /// Build a client for `base_url` with a per-request deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
