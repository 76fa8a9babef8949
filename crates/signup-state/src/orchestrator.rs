//! # Validation Orchestrator
//!
//! Owns the single [`FormState`] record and is the only thing that mutates
//! it. Three sources of truth feed it:
//!
//! - the synchronous field schema, re-run on every change and blur,
//! - the remote email verifier, whose completions are tag-checked,
//! - the address autocomplete widget, whose selections are resolved into
//!   canonical addresses.
//!
//! ## Submit Gate
//!
//! Only the schema result gates submission. The email validation state is
//! reported to the user but is not consulted by [`SignupOrchestrator::submit`].
//!
//! ## Locking
//!
//! State sits behind a `parking_lot::Mutex`. The lock is taken for each
//! transition and released before any remote call is awaited, so a slow
//! service never blocks input handling.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use signup_client::{EmailVerifier, PlaceSource, VerificationFailure, VerificationOutcome};
use signup_core::{validate, FieldErrors, FieldName, FormValues};
use thiserror::Error;

use crate::address::{resolve_place, AddressAutocomplete, AddressResolutionOutcome};
use crate::email::{Completion, EmailValidation, EmailValidationState};
use crate::sink::{SinkError, SubmissionSink};

/// Bounds on remote calls made by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub verify_timeout: Duration,
    pub resolve_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            verify_timeout: Duration::from_secs(10),
            resolve_timeout: Duration::from_secs(10),
        }
    }
}

/// Everything the form knows, in one record.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
    pub email: EmailValidation,
    pub address: AddressAutocomplete,
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the form should display outside the per-field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Why a submission was not accepted.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("form has errors: {0}")]
    Invalid(FieldErrors),
    #[error("submission sink failed: {0}")]
    Sink(#[from] SinkError),
}

/// Coordinates schema checks, remote verification, and address resolution
/// into a single submit decision.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SignupOrchestrator {
    state: Arc<Mutex<FormState>>,
    verifier: Arc<dyn EmailVerifier>,
    sink: Arc<dyn SubmissionSink>,
    settings: OrchestratorSettings,
}

impl std::fmt::Debug for SignupOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupOrchestrator")
            .field("state", &*self.state.lock())
            .field("settings", &self.settings)
            .finish()
    }
}

impl SignupOrchestrator {
    pub fn new(verifier: Arc<dyn EmailVerifier>, sink: Arc<dyn SubmissionSink>) -> Self {
        let state = FormState {
            errors: validate(&FormValues::default()),
            ..FormState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            verifier,
            sink,
            settings: OrchestratorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> FormState {
        self.state.lock().clone()
    }

    pub fn email_state(&self) -> EmailValidationState {
        self.state.lock().email.state().clone()
    }

    // ── Field input ─────────────────────────────────────────────────

    /// A field changed. A changed email value resets its validation.
    pub fn set_field(&self, field: FieldName, value: impl Into<String>) {
        let mut state = self.state.lock();
        let previous = state.values.set(field, value);
        if field == FieldName::Email && previous != state.values.email {
            state.email.reset();
        }
        state.errors = validate(&state.values);
    }

    /// Replace every field at once, as when restoring a saved draft.
    pub fn load_values(&self, values: FormValues) {
        let mut state = self.state.lock();
        if state.values.email != values.email {
            state.email.reset();
        }
        state.values = values;
        state.errors = validate(&state.values);
    }

    /// A field lost focus. Email blur additionally triggers
    /// [`on_email_blur`](Self::on_email_blur), which callers await separately.
    pub fn on_field_blur(&self, field: FieldName) -> Option<String> {
        let mut state = self.state.lock();
        state.errors = validate(&state.values);
        state.errors.get(field).map(str::to_string)
    }

    // ── Email verification ──────────────────────────────────────────

    /// The email field lost focus: verify the current value remotely.
    ///
    /// Returns the email validation state after this call's completion was
    /// applied or discarded. A blank email issues no request.
    pub async fn on_email_blur(&self) -> EmailValidationState {
        let tag = {
            let mut state = self.state.lock();
            state.errors = validate(&state.values);
            let email = state.values.email.trim().to_string();
            if email.is_empty() {
                return state.email.state().clone();
            }
            state.email.begin(&email)
        };
        tracing::debug!(generation = tag.generation, "email verification issued");

        let limit = self.settings.verify_timeout;
        let outcome = match tokio::time::timeout(limit, self.verifier.verify(&tag.email)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(generation = tag.generation, ?limit, "email verification timed out");
                VerificationOutcome::Failed(VerificationFailure::Timeout {
                    elapsed_ms: limit.as_millis() as u64,
                })
            }
        };

        let mut state = self.state.lock();
        let current = state.values.email.clone();
        match state.email.complete(&tag, &current, outcome) {
            Completion::Applied => {
                tracing::debug!(
                    generation = tag.generation,
                    result = %state.email.state(),
                    "email verification applied"
                );
            }
            Completion::Stale => {
                tracing::debug!(generation = tag.generation, "discarding stale email verification");
            }
        }
        state.email.state().clone()
    }

    // ── Mapping widget ──────────────────────────────────────────────

    pub fn on_script_loaded(&self) {
        tracing::info!("mapping script loaded");
        self.state.lock().address.script_loaded();
    }

    /// The mapping script failed; address autocomplete is disabled and the
    /// address field falls back to manual entry.
    pub fn on_script_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(%message, "mapping script failed to load");
        self.state.lock().address.script_failed(message);
    }

    pub fn on_widget_ready(&self, handle: Arc<dyn PlaceSource>) {
        tracing::debug!("autocomplete handle bound");
        self.state.lock().address.bind(handle);
    }

    pub fn address_autocomplete_enabled(&self) -> bool {
        self.state.lock().address.is_enabled()
    }

    /// The user picked a suggestion: resolve it and, on success, overwrite
    /// the address field with the canonical address.
    pub async fn on_place_changed(&self) -> AddressResolutionOutcome {
        let selection = { self.state.lock().address.begin_selection() };
        let Some((generation, handle)) = selection else {
            return AddressResolutionOutcome::NotReady;
        };

        let outcome = resolve_place(handle.as_ref(), self.settings.resolve_timeout).await;

        let mut state = self.state.lock();
        if !state.address.accepts(generation) {
            tracing::debug!(generation, "discarding stale place resolution");
            return outcome;
        }
        if let Some(resolved) = outcome.resolved() {
            state.values.address = resolved.formatted.clone();
            state.errors = validate(&state.values);
            tracing::debug!(
                generation,
                postal_code = ?resolved.postal_code,
                "address canonicalized"
            );
        }
        state.address.record(outcome.clone());
        outcome
    }

    // ── Display & submit ────────────────────────────────────────────

    /// Banners and field-adjacent messages the form should show.
    pub fn notices(&self) -> Vec<Notice> {
        let state = self.state.lock();
        let mut notices = Vec::new();
        if let crate::address::ScriptLoadStatus::Failed(message) = state.address.status() {
            notices.push(Notice {
                level: NoticeLevel::Error,
                message: format!("Error loading mapping service: {message}"),
            });
        }
        match state.email.state() {
            EmailValidationState::Validating => notices.push(Notice {
                level: NoticeLevel::Info,
                message: "Validating email...".to_string(),
            }),
            EmailValidationState::Invalid(reason) => notices.push(Notice {
                level: NoticeLevel::Error,
                message: reason.user_message(),
            }),
            EmailValidationState::Unknown | EmailValidationState::Valid => {}
        }
        notices
    }

    /// Submit the form if the field schema passes.
    ///
    /// The email validation state is not consulted.
    pub fn submit(&self) -> Result<FormValues, SubmitError> {
        let values = {
            let mut state = self.state.lock();
            state.errors = validate(&state.values);
            if !state.errors.is_empty() {
                tracing::debug!(errors = %state.errors, "submission blocked by field errors");
                return Err(SubmitError::Invalid(state.errors.clone()));
            }
            state.values.clone()
        };
        self.sink.submit(&values)?;
        tracing::info!("signup submitted");
        Ok(values)
    }
}
