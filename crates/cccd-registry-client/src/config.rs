//! Registry client configuration.
//!
//! Defaults point at the public thongtindoanhnghiep service. Override via
//! environment variables or explicit construction for testing.

use url::Url;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://thongtindoanhnghiep.co";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the registry API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TTDN_BASE_URL` (default: `https://thongtindoanhnghiep.co`)
    /// - `TTDN_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match std::env::var("TTDN_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url: env_url("TTDN_BASE_URL", DEFAULT_BASE_URL)?,
            timeout_secs,
        })
    }

    /// Configuration pointing at `base_url` (for mock servers).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl("base_url".to_string(), e.to_string()))?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid TTDN_TIMEOUT_SECS: \"{0}\"")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults_to_public_service() {
        // TTDN_* variables are not set in the test environment.
        let cfg = RegistryConfig::from_env().unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://thongtindoanhnghiep.co/");
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn with_base_url_parses() {
        let cfg = RegistryConfig::with_base_url("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert!(RegistryConfig::with_base_url("not a url").is_err());
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("CCCD_TEST_NONEXISTENT_URL_VAR", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("CCCD_TEST_BAD_TTDN_URL", "not a url");
        let result = env_url("CCCD_TEST_BAD_TTDN_URL", "https://example.com");
        std::env::remove_var("CCCD_TEST_BAD_TTDN_URL");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(..))));
    }
}
