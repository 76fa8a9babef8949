//! # Error Types
//!
//! Errors raised when raw strings are parsed into the form's typed
//! vocabulary. Field-level validation problems are not errors in this sense;
//! they are reported through [`crate::FieldErrors`].

use thiserror::Error;

/// Errors from parsing form vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The string does not name a form field.
    #[error("unknown form field: {0}")]
    UnknownField(String),

    /// The string is not one of the offered plan tiers.
    #[error("unknown tier: {0} (expected High, Medium, or Low)")]
    UnknownTier(String),

    /// The string is not one of the offered billing cycles.
    #[error("unknown billing cycle: {0} (expected Annual or Monthly)")]
    UnknownBilling(String),
}
