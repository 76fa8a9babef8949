//! Remote service configuration.
//!
//! Base URLs default to the production services. API keys are optional:
//! an absent key disables the dependent feature instead of failing startup.

use url::Url;
use zeroize::Zeroizing;

/// Default email verification service.
pub const DEFAULT_EMAIL_VALIDATION_URL: &str = "https://emailvalidation.abstractapi.com";

/// Default place lookup service.
pub const DEFAULT_MAPS_URL: &str = "https://maps.googleapis.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the remote services used during sign-up.
///
/// Custom `Debug` implementation redacts both API keys.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Base URL of the email verification service.
    pub email_validation_url: Url,
    /// API key for email verification. `None` disables verification.
    pub email_validation_api_key: Option<Zeroizing<String>>,
    /// Base URL of the place lookup service.
    pub maps_url: Url,
    /// API key for place lookup. `None` disables address autocomplete.
    pub maps_api_key: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<Zeroizing<String>>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ServiceConfig")
            .field("email_validation_url", &self.email_validation_url)
            .field("email_validation_api_key", &redact(&self.email_validation_api_key))
            .field("maps_url", &self.maps_url)
            .field("maps_api_key", &redact(&self.maps_api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SIGNUP_EMAIL_VALIDATION_API_KEY` (optional)
    /// - `SIGNUP_MAPS_API_KEY` (optional)
    /// - `SIGNUP_EMAIL_VALIDATION_URL` (default: [`DEFAULT_EMAIL_VALIDATION_URL`])
    /// - `SIGNUP_MAPS_URL` (default: [`DEFAULT_MAPS_URL`])
    /// - `SIGNUP_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            email_validation_url: env_url(
                "SIGNUP_EMAIL_VALIDATION_URL",
                DEFAULT_EMAIL_VALIDATION_URL,
            )?,
            email_validation_api_key: env_secret("SIGNUP_EMAIL_VALIDATION_API_KEY"),
            maps_url: env_url("SIGNUP_MAPS_URL", DEFAULT_MAPS_URL)?,
            maps_api_key: env_secret("SIGNUP_MAPS_API_KEY"),
            timeout_secs: std::env::var("SIGNUP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if config.email_validation_api_key.is_none() {
            tracing::warn!("SIGNUP_EMAIL_VALIDATION_API_KEY not set; email verification disabled");
        }
        if config.maps_api_key.is_none() {
            tracing::warn!("SIGNUP_MAPS_API_KEY not set; address autocomplete disabled");
        }
        Ok(config)
    }

    /// Create a configuration pointing at local mock servers (for testing).
    pub fn local_mock(
        email_validation_url: &str,
        maps_url: &str,
        api_key: &str,
    ) -> Result<Self, ConfigError> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))
        };
        Ok(Self {
            email_validation_url: parse(email_validation_url)?,
            email_validation_api_key: Some(Zeroizing::new(api_key.to_string())),
            maps_url: parse(maps_url)?,
            maps_api_key: Some(Zeroizing::new(api_key.to_string())),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_secret(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Zeroizing::new)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg =
            ServiceConfig::local_mock("http://127.0.0.1:9000", "http://127.0.0.1:9001", "k")
                .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.email_validation_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.maps_url.as_str(), "http://127.0.0.1:9001/");
        assert_eq!(cfg.maps_api_key.as_deref().map(String::as_str), Some("k"));
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = ServiceConfig::local_mock("http://a.test", "http://b.test", "sekrit").unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sekrit"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("SIGNUP_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("SIGNUP_TEST_BAD_URL", "not a url");
        let result = env_url("SIGNUP_TEST_BAD_URL", "https://example.com");
        std::env::remove_var("SIGNUP_TEST_BAD_URL");
        assert!(result.is_err());
    }

    #[test]
    fn blank_secret_is_treated_as_absent() {
        std::env::set_var("SIGNUP_TEST_BLANK_KEY", "  ");
        let secret = env_secret("SIGNUP_TEST_BLANK_KEY");
        std::env::remove_var("SIGNUP_TEST_BLANK_KEY");
        assert!(secret.is_none());
    }
}
