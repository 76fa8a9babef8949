//! Typed client for the email verification service.
//!
//! One call per address: `GET {base}/v1/?api_key=…&email=…`. The response
//! carries boolean flags wrapped as `{"value": bool, "text": "…"}` and a
//! deliverability classification string.
//!
//! Every call resolves into a [`VerificationOutcome`]; transport, auth,
//! rate-limit, and decode problems become [`VerificationFailure`] values
//! instead of escaping as errors.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::config::ServiceConfig;
use crate::error::ClientError;
use crate::retry::retry_send;

/// Path of the verification endpoint relative to the base URL.
const VERIFY_PATH: &str = "v1/";

// -- Outcome types ------------------------------------------------------------

/// Upstream deliverability classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Deliverability {
    Deliverable,
    Undeliverable,
    Risky,
    /// Also the catch-all for classifications this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Deliverability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deliverable => write!(f, "DELIVERABLE"),
            Self::Undeliverable => write!(f, "UNDELIVERABLE"),
            Self::Risky => write!(f, "RISKY"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A completed check of one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReport {
    /// Well-formed AND deliverable.
    pub valid: bool,
    /// Whether upstream judged the address syntactically well-formed.
    pub valid_format: bool,
    /// Address belongs to a free mailbox provider.
    pub free_provider: bool,
    /// Address belongs to a disposable mailbox provider.
    pub disposable: bool,
    pub deliverability: Deliverability,
    /// Raw response body.
    pub details: serde_json::Value,
}

/// Why a verification call did not produce a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    #[error("no email address supplied")]
    MissingEmail,
    #[error("email verification is not configured (missing API key)")]
    MissingApiKey,
    #[error("email verification service unreachable: {reason}")]
    Transport { reason: String },
    #[error("email verification timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    #[error("email verification rejected credentials (HTTP {status})")]
    Unauthorized { status: u16 },
    #[error("email verification rate limit exceeded")]
    RateLimited,
    #[error("email verification service returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("email verification response could not be decoded: {reason}")]
    Parse { reason: String },
}

/// Result of verifying one address.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// Upstream answered; the report says whether the address is valid.
    Checked(EmailReport),
    /// No answer could be obtained. Never valid.
    Failed(VerificationFailure),
}

impl VerificationOutcome {
    /// Whether the address was confirmed well-formed and deliverable.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Checked(report) if report.valid)
    }
}

// -- Verifier seam ------------------------------------------------------------

/// Something that can check an email address for deliverability.
///
/// Implementations must not panic or return early with an error: every
/// failure is expressed as [`VerificationOutcome::Failed`].
#[async_trait]
pub trait EmailVerifier: Send + Sync {
    async fn verify(&self, email: &str) -> VerificationOutcome;
}

// -- Wire types ---------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct Flag {
    #[serde(default)]
    value: Option<bool>,
}

impl Flag {
    fn get(flag: &Option<Flag>) -> bool {
        flag.as_ref().and_then(|f| f.value).unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    is_valid_format: Option<Flag>,
    #[serde(default)]
    is_free_email: Option<Flag>,
    #[serde(default)]
    is_disposable_email: Option<Flag>,
    #[serde(default)]
    deliverability: Deliverability,
}

/// Build a report from a decoded response body.
///
/// Valid only when the format flag is true and deliverability is
/// `DELIVERABLE`; risky and unknown addresses are not valid.
pub fn report_from_body(body: serde_json::Value) -> Result<EmailReport, VerificationFailure> {
    let parsed: VerifyResponse =
        serde_json::from_value(body.clone()).map_err(|e| VerificationFailure::Parse {
            reason: e.to_string(),
        })?;
    let valid_format = Flag::get(&parsed.is_valid_format);
    Ok(EmailReport {
        valid: valid_format && parsed.deliverability == Deliverability::Deliverable,
        valid_format,
        free_provider: Flag::get(&parsed.is_free_email),
        disposable: Flag::get(&parsed.is_disposable_email),
        deliverability: parsed.deliverability,
        details: body,
    })
}

// -- Client -------------------------------------------------------------------

/// HTTP client for the email verification service.
#[derive(Clone)]
pub struct EmailVerificationClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
    timeout: Duration,
}

impl std::fmt::Debug for EmailVerificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailVerificationClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EmailVerificationClient {
    /// Build a client from configuration.
    ///
    /// A missing API key is not an error here: the client is built and every
    /// call fails fast with [`VerificationFailure::MissingApiKey`].
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build {
                service: "email-verification",
                source: e,
            })?;
        let endpoint = config
            .email_validation_url
            .join(VERIFY_PATH)
            .map_err(|e| {
                crate::config::ConfigError::InvalidUrl(
                    config.email_validation_url.to_string(),
                    e.to_string(),
                )
            })?;
        Ok(Self {
            http,
            endpoint,
            api_key: config.email_validation_api_key.clone(),
            timeout,
        })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn check(&self, email: &str) -> Result<EmailReport, VerificationFailure> {
        let email = email.trim();
        if email.is_empty() {
            return Err(VerificationFailure::MissingEmail);
        }
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(VerificationFailure::MissingApiKey)?;

        tracing::debug!(endpoint = %self.endpoint, "issuing email verification request");
        let resp = retry_send(|| {
            self.http
                .get(self.endpoint.clone())
                .query(&[("api_key", api_key.as_str()), ("email", email)])
                .send()
        })
        .await
        .map_err(|e| {
            if e.is_timeout() {
                VerificationFailure::Timeout {
                    elapsed_ms: self.timeout.as_millis() as u64,
                }
            } else {
                VerificationFailure::Transport {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(VerificationFailure::Unauthorized {
                    status: status.as_u16(),
                })
            }
            429 => return Err(VerificationFailure::RateLimited),
            _ if !status.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(VerificationFailure::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| VerificationFailure::Parse {
            reason: e.to_string(),
        })?;
        report_from_body(body)
    }
}

#[async_trait]
impl EmailVerifier for EmailVerificationClient {
    async fn verify(&self, email: &str) -> VerificationOutcome {
        match self.check(email).await {
            Ok(report) => VerificationOutcome::Checked(report),
            Err(failure) => {
                tracing::warn!(%failure, "email verification failed");
                VerificationOutcome::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deliverable_and_well_formed_is_valid() {
        let report = report_from_body(json!({
            "email": "user@example.com",
            "is_valid_format": {"value": true, "text": "TRUE"},
            "is_free_email": {"value": false, "text": "FALSE"},
            "is_disposable_email": {"value": false, "text": "FALSE"},
            "deliverability": "DELIVERABLE"
        }))
        .unwrap();
        assert!(report.valid);
        assert!(!report.free_provider);
        assert_eq!(report.details["email"], "user@example.com");
    }

    #[test]
    fn risky_is_not_valid() {
        let report = report_from_body(json!({
            "is_valid_format": {"value": true},
            "deliverability": "RISKY"
        }))
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.deliverability, Deliverability::Risky);
    }

    #[test]
    fn malformed_but_deliverable_is_not_valid() {
        let report = report_from_body(json!({
            "is_valid_format": {"value": false},
            "deliverability": "DELIVERABLE"
        }))
        .unwrap();
        assert!(!report.valid);
    }

    #[test]
    fn unrecognized_deliverability_maps_to_unknown() {
        let report = report_from_body(json!({
            "is_valid_format": {"value": true},
            "deliverability": "CATCH_ALL"
        }))
        .unwrap();
        assert_eq!(report.deliverability, Deliverability::Unknown);
        assert!(!report.valid);
    }

    #[test]
    fn missing_fields_default_to_invalid() {
        let report = report_from_body(json!({})).unwrap();
        assert!(!report.valid);
        assert!(!report.valid_format);
        assert_eq!(report.deliverability, Deliverability::Unknown);
    }

    #[test]
    fn non_object_body_is_parse_failure() {
        let err = report_from_body(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, VerificationFailure::Parse { .. }));
    }

    #[test]
    fn failed_outcome_is_never_valid() {
        assert!(!VerificationOutcome::Failed(VerificationFailure::RateLimited).is_valid());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let mut config =
            ServiceConfig::local_mock("http://127.0.0.1:1", "http://127.0.0.1:1", "k").unwrap();
        config.email_validation_api_key = None;
        let client = EmailVerificationClient::new(&config).unwrap();
        assert!(!client.is_configured());
        assert_eq!(
            client.verify("user@example.com").await,
            VerificationOutcome::Failed(VerificationFailure::MissingApiKey)
        );
    }

    #[tokio::test]
    async fn blank_email_fails_without_network() {
        let config =
            ServiceConfig::local_mock("http://127.0.0.1:1", "http://127.0.0.1:1", "k").unwrap();
        let client = EmailVerificationClient::new(&config).unwrap();
        assert_eq!(
            client.verify("  ").await,
            VerificationOutcome::Failed(VerificationFailure::MissingEmail)
        );
    }
}
