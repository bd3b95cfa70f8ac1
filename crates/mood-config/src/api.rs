//! Remote service configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    String::from("http://localhost:8000/api/v1")
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("moodtask/{}", env!("CARGO_PKG_VERSION"))
}

/// Where the analysis and task services live and how long to wait for them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL shared by both services, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds, applied to every call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                "must start with http:// or https://",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("api.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("moodtask/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "api.timeout_secs"
        ));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
