//! Typed client for the place lookup service, plus the selection handle
//! that an autocomplete widget binds to.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/maps/api/place/autocomplete/json` | Address suggestions for typed input |
//! | GET | `/maps/api/place/details/json` | Formatted address and components for a place |
//!
//! Both respond with HTTP 200 and a `status` field; `OK` and `ZERO_RESULTS`
//! are successes, anything else (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, …) is
//! reported as [`PlacesError::Status`].

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::config::ServiceConfig;
use crate::error::ClientError;
use crate::retry::retry_send;

const AUTOCOMPLETE_PATH: &str = "maps/api/place/autocomplete/json";
const DETAILS_PATH: &str = "maps/api/place/details/json";
const DETAILS_FIELDS: &str = "place_id,formatted_address,address_components";

// -- Types matching the place lookup schemas ---------------------------------

/// One structured component of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    /// Component kinds, e.g. `postal_code`, `locality`.
    #[serde(default)]
    pub types: Vec<String>,
}

/// A place as returned by the details lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

impl Place {
    /// First component carrying the given kind.
    pub fn component(&self, kind: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
    }

    /// Postal code, if the place has one.
    pub fn postal_code(&self) -> Option<&str> {
        self.component("postal_code").map(|c| c.long_name.as_str())
    }

    /// Formatted address, if present and non-blank.
    pub fn usable_address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// An autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub description: String,
    pub place_id: String,
}

/// Restrictions applied to suggestion lookups.
///
/// Defaults to street addresses in the United States; callers override
/// individual settings with the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub types: Vec<String>,
    /// ISO 3166-1 alpha-2 country restriction.
    pub country: Option<String>,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            types: vec!["address".to_string()],
            country: Some("us".to_string()),
        }
    }
}

impl AutocompleteOptions {
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_country(mut self, country: Option<&str>) -> Self {
        self.country = country.map(str::to_string);
        self
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.types.is_empty() {
            pairs.push(("types", self.types.join("|")));
        }
        if let Some(country) = &self.country {
            pairs.push(("components", format!("country:{country}")));
        }
        pairs
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<Place>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

// -- Errors -------------------------------------------------------------------

/// Errors from place lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacesError {
    #[error("place lookup unreachable: {reason}")]
    Transport { reason: String },
    #[error("place lookup timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    #[error("place lookup returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("place lookup status {status}{}", detail_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
    #[error("place lookup response could not be decoded: {reason}")]
    Parse { reason: String },
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

// -- Selection seam -----------------------------------------------------------

/// The widget's current selection, read once per selection event.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// The place the user picked, or `None` if nothing usable is selected.
    async fn current_place(&self) -> Result<Option<Place>, PlacesError>;
}

// -- Client -------------------------------------------------------------------

/// HTTP client for the place lookup service.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Zeroizing<String>,
    timeout: Duration,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PlacesClient {
    /// Build a client from configuration. Requires a maps API key.
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let api_key = config
            .maps_api_key
            .clone()
            .ok_or(ClientError::MissingApiKey { service: "maps" })?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build {
                service: "maps",
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.maps_url.clone(),
            api_key,
            timeout,
        })
    }

    /// Look up the formatted address and components of a place.
    ///
    /// Returns `Ok(None)` when the service knows no such place.
    pub async fn place_details(&self, place_id: &str) -> Result<Option<Place>, PlacesError> {
        let query = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
        ];
        let resp: DetailsResponse = self.get_json(DETAILS_PATH, query).await?;
        match resp.status.as_str() {
            "OK" => Ok(resp.result),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            _ => Err(PlacesError::Status {
                status: resp.status,
                message: resp.error_message,
            }),
        }
    }

    /// Address suggestions for partially typed input.
    pub async fn autocomplete(
        &self,
        input: &str,
        options: &AutocompleteOptions,
    ) -> Result<Vec<Prediction>, PlacesError> {
        let mut query = vec![("input", input.to_string())];
        query.extend(options.query_pairs());
        let resp: AutocompleteResponse = self.get_json(AUTOCOMPLETE_PATH, query).await?;
        match resp.status.as_str() {
            "OK" => Ok(resp.predictions),
            "ZERO_RESULTS" => Ok(Vec::new()),
            _ => Err(PlacesError::Status {
                status: resp.status,
                message: resp.error_message,
            }),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(&'static str, String)>,
    ) -> Result<T, PlacesError> {
        let url = self.base_url.join(path).map_err(|e| PlacesError::Transport {
            reason: format!("invalid endpoint {path}: {e}"),
        })?;
        query.push(("key", self.api_key.as_str().to_string()));

        let resp = retry_send(|| self.http.get(url.clone()).query(&query).send())
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlacesError::Timeout {
                        elapsed_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    PlacesError::Transport {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| PlacesError::Parse {
            reason: e.to_string(),
        })
    }
}

// -- Widget handle ------------------------------------------------------------

/// Selection handle bound to an autocomplete widget.
///
/// The widget records the picked suggestion with [`select`](Self::select);
/// [`PlaceSource::current_place`] then resolves whatever is selected at the
/// moment it is read.
#[derive(Debug)]
pub struct AutocompleteHandle {
    client: PlacesClient,
    options: AutocompleteOptions,
    selected: RwLock<Option<String>>,
}

impl AutocompleteHandle {
    pub fn new(client: PlacesClient, options: AutocompleteOptions) -> Self {
        Self {
            client,
            options,
            selected: RwLock::new(None),
        }
    }

    /// Record the suggestion the user picked.
    pub fn select(&self, place_id: impl Into<String>) {
        *self.selected.write() = Some(place_id.into());
    }

    /// Drop the current selection.
    pub fn clear(&self) {
        *self.selected.write() = None;
    }

    /// Suggestions for typed input using the handle's options.
    pub async fn suggest(&self, input: &str) -> Result<Vec<Prediction>, PlacesError> {
        self.client.autocomplete(input, &self.options).await
    }
}

#[async_trait]
impl PlaceSource for AutocompleteHandle {
    async fn current_place(&self) -> Result<Option<Place>, PlacesError> {
        let selected = self.selected.read().clone();
        match selected {
            Some(place_id) => self.client.place_details(&place_id).await,
            None => Ok(None),
        }
    }
}
