//! # Email Validation State Machine
//!
//! Tracks the remote deliverability check of the form's email field.
//!
//! ## States
//!
//! ```text
//!            begin                 complete (tag matches)
//! Unknown ─────────▶ Validating ─────────────────────────▶ Valid
//!    ▲                   │                                  Invalid(reason)
//!    │   new input       │  complete (stale tag)
//!    └───────────────────┴──────────▶ discarded, state unchanged
//! ```
//!
//! ## Stale Responses
//!
//! Transport does not preserve request order. Every request is tagged with
//! a monotonically increasing generation and the email value it checks.
//! A completion is applied only when its tag is the one most recently issued
//! AND its email still equals the field value. New input bumps the
//! generation, so anything in flight at that moment can never land.

use serde::{Deserialize, Serialize};
use signup_client::{Deliverability, VerificationFailure, VerificationOutcome};

// ─── States ──────────────────────────────────────────────────────────

/// Why an address is considered invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The service answered and the address is malformed or not deliverable.
    Rejected {
        valid_format: bool,
        deliverability: Deliverability,
    },
    /// No answer could be obtained from the service.
    Unverified(VerificationFailure),
}

impl InvalidReason {
    /// Message shown next to the email field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { .. } => "Invalid email address".to_string(),
            Self::Unverified(failure) => format!("Could not verify email address: {failure}"),
        }
    }
}

/// Validity of the email field as known from the remote check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationState {
    /// No check has run for the current value.
    Unknown,
    /// A check for the current value is in flight.
    Validating,
    Valid,
    Invalid(InvalidReason),
}

impl EmailValidationState {
    /// Whether a check has finished for the current value.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Valid | Self::Invalid(_))
    }

    fn from_outcome(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Checked(report) if report.valid => Self::Valid,
            VerificationOutcome::Checked(report) => Self::Invalid(InvalidReason::Rejected {
                valid_format: report.valid_format,
                deliverability: report.deliverability,
            }),
            VerificationOutcome::Failed(failure) => {
                Self::Invalid(InvalidReason::Unverified(failure))
            }
        }
    }
}

impl std::fmt::Display for EmailValidationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Validating => write!(f, "VALIDATING"),
            Self::Valid => write!(f, "VALID"),
            Self::Invalid(InvalidReason::Rejected { deliverability, .. }) => {
                write!(f, "INVALID({deliverability})")
            }
            Self::Invalid(InvalidReason::Unverified(_)) => write!(f, "INVALID(UNVERIFIED)"),
        }
    }
}

// ─── Request Tags ────────────────────────────────────────────────────

/// Identity of one issued verification request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTag {
    pub generation: u64,
    /// The (trimmed) email value the request checks.
    pub email: String,
}

/// Result of offering a completion to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

// ─── Tracker ─────────────────────────────────────────────────────────

/// Transitions kept in [`EmailValidation::history`].
pub const HISTORY_LIMIT: usize = 16;

/// Email validation state plus the bookkeeping needed to reject stale
/// completions.
#[derive(Debug, Clone)]
pub struct EmailValidation {
    state: EmailValidationState,
    generation: u64,
    in_flight: Option<RequestTag>,
    history: Vec<EmailValidationState>,
}

impl Default for EmailValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailValidation {
    pub fn new() -> Self {
        Self {
            state: EmailValidationState::Unknown,
            generation: 0,
            in_flight: None,
            history: vec![EmailValidationState::Unknown],
        }
    }

    pub fn state(&self) -> &EmailValidationState {
        &self.state
    }

    /// The most recent states entered, oldest first, at most
    /// [`HISTORY_LIMIT`] of them.
    pub fn history(&self) -> &[EmailValidationState] {
        &self.history
    }

    /// The request whose completion would currently be applied.
    pub fn in_flight(&self) -> Option<&RequestTag> {
        self.in_flight.as_ref()
    }

    /// The email field changed: forget the previous result and orphan any
    /// in-flight request.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.enter(EmailValidationState::Unknown);
    }

    /// Start a check of `email`, superseding any request still in flight.
    pub fn begin(&mut self, email: &str) -> RequestTag {
        self.generation += 1;
        let tag = RequestTag {
            generation: self.generation,
            email: email.trim().to_string(),
        };
        self.in_flight = Some(tag.clone());
        self.enter(EmailValidationState::Validating);
        tag
    }

    /// Offer a completion. Applied only if `tag` is the latest issued request
    /// and `current_email` still matches what it checked.
    pub fn complete(
        &mut self,
        tag: &RequestTag,
        current_email: &str,
        outcome: VerificationOutcome,
    ) -> Completion {
        let latest = self.in_flight.as_ref() == Some(tag);
        if !latest || tag.email != current_email.trim() {
            return Completion::Stale;
        }
        self.in_flight = None;
        self.enter(EmailValidationState::from_outcome(outcome));
        Completion::Applied
    }

    fn enter(&mut self, next: EmailValidationState) {
        if self.state != next {
            if self.history.len() == HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(next.clone());
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signup_client::email::report_from_body;

    fn deliverable() -> VerificationOutcome {
        VerificationOutcome::Checked(
            report_from_body(serde_json::json!({
                "is_valid_format": {"value": true},
                "deliverability": "DELIVERABLE"
            }))
            .unwrap(),
        )
    }

    fn undeliverable() -> VerificationOutcome {
        VerificationOutcome::Checked(
            report_from_body(serde_json::json!({
                "is_valid_format": {"value": true},
                "deliverability": "UNDELIVERABLE"
            }))
            .unwrap(),
        )
    }

    #[test]
    fn begins_unknown() {
        let v = EmailValidation::new();
        assert_eq!(v.state(), &EmailValidationState::Unknown);
        assert_eq!(v.history(), &[EmailValidationState::Unknown]);
        assert!(v.in_flight().is_none());
    }

    #[test]
    fn matching_completion_is_applied() {
        let mut v = EmailValidation::new();
        let tag = v.begin("user@example.com");
        assert_eq!(v.state(), &EmailValidationState::Validating);
        assert_eq!(v.complete(&tag, "user@example.com", deliverable()), Completion::Applied);
        assert_eq!(v.state(), &EmailValidationState::Valid);
        assert!(v.in_flight().is_none());
    }

    #[test]
    fn superseded_request_is_stale() {
        let mut v = EmailValidation::new();
        let first = v.begin("a@example.com");
        let second = v.begin("a@example.com");
        assert_eq!(v.complete(&first, "a@example.com", undeliverable()), Completion::Stale);
        assert_eq!(v.state(), &EmailValidationState::Validating);
        assert_eq!(v.complete(&second, "a@example.com", deliverable()), Completion::Applied);
        assert_eq!(v.state(), &EmailValidationState::Valid);
    }

    #[test]
    fn reset_orphans_in_flight_request() {
        let mut v = EmailValidation::new();
        let tag = v.begin("a@example.com");
        v.reset();
        assert_eq!(v.state(), &EmailValidationState::Unknown);
        assert_eq!(v.complete(&tag, "a@example.com", deliverable()), Completion::Stale);
        assert_eq!(v.state(), &EmailValidationState::Unknown);
    }

    #[test]
    fn changed_field_value_is_stale() {
        let mut v = EmailValidation::new();
        let tag = v.begin("a@example.com");
        assert_eq!(v.complete(&tag, "b@example.com", deliverable()), Completion::Stale);
    }

    #[test]
    fn tag_email_is_trimmed() {
        let mut v = EmailValidation::new();
        let tag = v.begin(" a@example.com ");
        assert_eq!(tag.email, "a@example.com");
        assert_eq!(v.complete(&tag, "a@example.com  ", deliverable()), Completion::Applied);
    }

    #[test]
    fn failure_is_unverified_not_rejected() {
        let mut v = EmailValidation::new();
        let tag = v.begin("a@example.com");
        v.complete(
            &tag,
            "a@example.com",
            VerificationOutcome::Failed(VerificationFailure::RateLimited),
        );
        let EmailValidationState::Invalid(reason) = v.state() else {
            panic!("expected invalid");
        };
        assert_eq!(reason, &InvalidReason::Unverified(VerificationFailure::RateLimited));
        assert!(reason.user_message().starts_with("Could not verify"));
    }

    #[test]
    fn rejection_message_matches_form_copy() {
        let mut v = EmailValidation::new();
        let tag = v.begin("a@example.com");
        v.complete(&tag, "a@example.com", undeliverable());
        let EmailValidationState::Invalid(reason) = v.state() else {
            panic!("expected invalid");
        };
        assert_eq!(reason.user_message(), "Invalid email address");
        assert_eq!(v.state().to_string(), "INVALID(UNDELIVERABLE)");
    }

    #[test]
    fn history_records_only_changes() {
        let mut v = EmailValidation::new();
        v.reset();
        v.reset();
        let tag = v.begin("a@example.com");
        v.complete(&tag, "a@example.com", deliverable());
        assert_eq!(
            v.history(),
            &[
                EmailValidationState::Unknown,
                EmailValidationState::Validating,
                EmailValidationState::Valid
            ]
        );
    }

    #[test]
    fn history_keeps_only_recent_transitions() {
        let mut v = EmailValidation::new();
        for i in 0..50 {
            let email = format!("user{i}@example.com");
            let tag = v.begin(&email);
            v.complete(&tag, &email, deliverable());
            v.reset();
        }
        assert_eq!(v.history().len(), HISTORY_LIMIT);
        assert_eq!(v.history().last(), Some(&EmailValidationState::Unknown));
        assert_eq!(v.state(), &EmailValidationState::Unknown);
    }
}
