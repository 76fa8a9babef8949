//! Client construction error types.

/// Errors building a remote service client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service requires an API key and none was configured.
    #[error("no API key configured for {service}")]
    MissingApiKey { service: &'static str },
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client for {service}: {source}")]
    Build {
        service: &'static str,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
