//! # Field Schema Validator
//!
//! Maps a [`FormValues`] record to the set of per-field error messages.
//! Pure and deterministic: the same record always yields the same errors.
//!
//! ## Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | firstName, lastName, address | required |
//! | dob | required, ISO calendar date |
//! | tier | required, one of High/Medium/Low |
//! | billing | required, one of Annual/Monthly |
//! | middleInitial | at most one character |
//! | email | required, `local@domain.tld` shape |
//!
//! Whitespace-only values count as blank for required fields. The middle
//! initial length is counted as entered, padding included. The email rule is syntactic only;
//! deliverability is checked elsewhere and never reported here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::{Billing, FieldName, FormValues, Tier};

/// Date format produced by HTML date inputs.
const DOB_FORMAT: &str = "%Y-%m-%d";

// ─── Field Errors ────────────────────────────────────────────────────

/// Per-field error messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is in error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields in error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for a field, if it is in error.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether the field is in error.
    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    /// Fields in error with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// ─── Validation ──────────────────────────────────────────────────────

/// Validate a form record against the field schema.
pub fn validate(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require(&mut errors, values, FieldName::FirstName, "First name is required");
    require(&mut errors, values, FieldName::LastName, "Last name is required");
    require(&mut errors, values, FieldName::Address, "Address is required");

    if values.middle_initial.chars().count() > 1 {
        errors.insert(FieldName::MiddleInitial, "Only one character allowed");
    }

    let email = values.email.trim();
    if email.is_empty() {
        errors.insert(FieldName::Email, "Email is required");
    } else if !is_email_syntax(email) {
        errors.insert(FieldName::Email, "Invalid email");
    }

    let dob = values.dob.trim();
    if dob.is_empty() {
        errors.insert(FieldName::Dob, "Date of birth is required");
    } else if NaiveDate::parse_from_str(dob, DOB_FORMAT).is_err() {
        errors.insert(FieldName::Dob, "Date of birth must be a valid date");
    }

    let tier = values.tier.trim();
    if tier.is_empty() {
        errors.insert(FieldName::Tier, "Tier selection is required");
    } else if tier.parse::<Tier>().is_err() {
        errors.insert(FieldName::Tier, "Tier must be one of High, Medium, Low");
    }

    let billing = values.billing.trim();
    if billing.is_empty() {
        errors.insert(FieldName::Billing, "Billing cycle is required");
    } else if billing.parse::<Billing>().is_err() {
        errors.insert(FieldName::Billing, "Billing cycle must be Annual or Monthly");
    }

    errors
}

fn require(errors: &mut FieldErrors, values: &FormValues, field: FieldName, message: &str) {
    if values.get(field).trim().is_empty() {
        errors.insert(field, message);
    }
}

/// Syntactic `local@domain.tld` check.
///
/// Exactly one `@`, a non-empty local part, and a domain of at least two
/// non-empty dot-separated labels. No whitespace anywhere.
pub fn is_email_syntax(candidate: &str) -> bool {
    if candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}
