//! Licensing server client configuration.
//!
//! Base URL and timeout come from the environment in production.
//! Activation must not hang the point of sale, so the timeout default
//! is deliberately short.

use url::Url;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for connecting to the licensing server.
#[derive(Debug, Clone)]
pub struct LicenseServerConfig {
    /// Base URL of the licensing server.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl LicenseServerConfig {
    /// Build a configuration with the default timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LICENSE_SERVER_URL` (required)
    /// - `LICENSE_SERVER_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("LICENSE_SERVER_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("LICENSE_SERVER_URL".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: std::env::var("LICENSE_SERVER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LICENSE_SERVER_URL environment variable is required")]
    MissingBaseUrl,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_timeout() {
        let cfg = LicenseServerConfig::new("http://127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn from_env_requires_base_url() {
        std::env::remove_var("LICENSE_SERVER_URL");
        assert!(matches!(
            LicenseServerConfig::from_env(),
            Err(ConfigError::MissingBaseUrl)
        ));
    }
}
