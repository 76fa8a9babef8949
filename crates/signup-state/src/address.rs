//! # Address Autocomplete Lifecycle
//!
//! Tracks the external mapping widget (script load status and the bound
//! selection handle) and turns a picked suggestion into a canonical address.
//!
//! ```text
//! Loading ──▶ Loaded ──(handle bound)──▶ autocomplete enabled
//!    │
//!    └──────▶ Failed(message) ──▶ autocomplete disabled, manual typing only
//! ```
//!
//! Resolution is only offered once the script is loaded and a handle is
//! bound. Each selection event gets a generation; a slower, earlier
//! resolution is never applied over a later one.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signup_client::{AddressComponent, PlaceSource};

// ─── Script Status ───────────────────────────────────────────────────

/// Load status of the external mapping script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptLoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

impl std::fmt::Display for ScriptLoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "LOADING"),
            Self::Loaded => write!(f, "LOADED"),
            Self::Failed(message) => write!(f, "FAILED: {message}"),
        }
    }
}

// ─── Resolution Outcome ──────────────────────────────────────────────

/// A canonical address produced from a picked suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Service-confirmed formatted address.
    pub formatted: String,
    /// Extracted for callers; not written into any form field.
    pub postal_code: Option<String>,
    pub components: Vec<AddressComponent>,
}

/// Outcome of one selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResolutionOutcome {
    Resolved(ResolvedAddress),
    /// Script not loaded, loading failed, or no handle bound yet.
    NotReady,
    /// The handle had no current selection.
    NoSelection,
    /// The selection could not be turned into an address.
    Failed { reason: String },
}

impl AddressResolutionOutcome {
    pub fn resolved(&self) -> Option<&ResolvedAddress> {
        match self {
            Self::Resolved(address) => Some(address),
            _ => None,
        }
    }
}

/// Read the current selection from `source` and extract a canonical address.
///
/// Never fails: timeouts, lookup errors, and selections without a usable
/// formatted address all become [`AddressResolutionOutcome::Failed`].
pub async fn resolve_place(source: &dyn PlaceSource, timeout: Duration) -> AddressResolutionOutcome {
    let place = match tokio::time::timeout(timeout, source.current_place()).await {
        Err(_) => {
            tracing::warn!(?timeout, "place resolution timed out");
            return AddressResolutionOutcome::Failed {
                reason: format!("place lookup timed out after {}ms", timeout.as_millis()),
            };
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "place resolution failed");
            return AddressResolutionOutcome::Failed {
                reason: e.to_string(),
            };
        }
        Ok(Ok(None)) => return AddressResolutionOutcome::NoSelection,
        Ok(Ok(Some(place))) => place,
    };

    match place.usable_address() {
        Some(formatted) => AddressResolutionOutcome::Resolved(ResolvedAddress {
            formatted: formatted.to_string(),
            postal_code: place.postal_code().map(str::to_string),
            components: place.address_components.clone(),
        }),
        None => {
            tracing::warn!("place selection did not return a formatted address");
            AddressResolutionOutcome::Failed {
                reason: "selection did not include a formatted address".to_string(),
            }
        }
    }
}

// ─── Widget State ────────────────────────────────────────────────────

/// Mapping widget status and the handle it exposes.
#[derive(Clone)]
pub struct AddressAutocomplete {
    status: ScriptLoadStatus,
    handle: Option<Arc<dyn PlaceSource>>,
    generation: u64,
    last: Option<AddressResolutionOutcome>,
}

impl std::fmt::Debug for AddressAutocomplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressAutocomplete")
            .field("status", &self.status)
            .field("handle_bound", &self.handle.is_some())
            .field("generation", &self.generation)
            .field("last", &self.last)
            .finish()
    }
}

impl Default for AddressAutocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressAutocomplete {
    pub fn new() -> Self {
        Self {
            status: ScriptLoadStatus::Loading,
            handle: None,
            generation: 0,
            last: None,
        }
    }

    pub fn status(&self) -> &ScriptLoadStatus {
        &self.status
    }

    pub fn script_loaded(&mut self) {
        self.status = ScriptLoadStatus::Loaded;
    }

    /// Loading failed; autocomplete stays disabled and the handle is dropped.
    /// Resolutions already in flight are orphaned.
    pub fn script_failed(&mut self, message: impl Into<String>) {
        self.status = ScriptLoadStatus::Failed(message.into());
        self.handle = None;
        self.generation += 1;
    }

    /// Bind the widget's selection handle.
    pub fn bind(&mut self, handle: Arc<dyn PlaceSource>) {
        if matches!(self.status, ScriptLoadStatus::Failed(_)) {
            tracing::warn!("ignoring widget handle: mapping script failed to load");
            return;
        }
        self.handle = Some(handle);
    }

    /// Whether suggestion selection can currently resolve addresses.
    pub fn is_enabled(&self) -> bool {
        self.status == ScriptLoadStatus::Loaded && self.handle.is_some()
    }

    /// Start handling a selection event.
    ///
    /// Returns the selection generation and the handle to read, or `None`
    /// (after recording [`AddressResolutionOutcome::NotReady`]) when
    /// autocomplete is not available.
    pub fn begin_selection(&mut self) -> Option<(u64, Arc<dyn PlaceSource>)> {
        let handle = match (&self.status, &self.handle) {
            (ScriptLoadStatus::Loaded, Some(handle)) => Arc::clone(handle),
            (status, _) => {
                tracing::warn!(%status, "address autocomplete is not ready");
                self.last = Some(AddressResolutionOutcome::NotReady);
                return None;
            }
        };
        self.generation += 1;
        Some((self.generation, handle))
    }

    /// Whether a resolution started at `generation` is still the latest.
    pub fn accepts(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn record(&mut self, outcome: AddressResolutionOutcome) {
        self.last = Some(outcome);
    }

    /// Outcome of the most recent applied selection event.
    pub fn last_resolution(&self) -> Option<&AddressResolutionOutcome> {
        self.last.as_ref()
    }
}
