//! # Form Record
//!
//! The raw sign-up record and the vocabulary used to address its fields.
//!
//! ```text
//! firstName  middleInitial  lastName  email  dob  address  tier  billing
//! ```
//!
//! Every field except `middleInitial` must be non-empty at submit time. The
//! record serializes with the camelCase names above so that stored records
//! match what the browser form posts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

// ─── Field Names ─────────────────────────────────────────────────────

/// A field of the sign-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    MiddleInitial,
    LastName,
    Email,
    Dob,
    Address,
    Tier,
    Billing,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 8] = [
        Self::FirstName,
        Self::MiddleInitial,
        Self::LastName,
        Self::Email,
        Self::Dob,
        Self::Address,
        Self::Tier,
        Self::Billing,
    ];

    /// The wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::MiddleInitial => "middleInitial",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Dob => "dob",
            Self::Address => "address",
            Self::Tier => "tier",
            Self::Billing => "billing",
        }
    }

    /// Whether the field must be non-empty at submit time.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::MiddleInitial)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

// ─── Plan Enums ──────────────────────────────────────────────────────

/// Subscription tier offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Tier {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(FormError::UnknownTier(other.to_string())),
        }
    }
}

/// Billing cycle offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Billing {
    Annual,
    Monthly,
}

impl std::fmt::Display for Billing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Annual => write!(f, "Annual"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

impl FromStr for Billing {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Annual" => Ok(Self::Annual),
            "Monthly" => Ok(Self::Monthly),
            other => Err(FormError::UnknownBilling(other.to_string())),
        }
    }
}

// ─── Form Values ─────────────────────────────────────────────────────

/// Raw values of the sign-up form, exactly as entered.
///
/// An empty string means the field was left blank. Missing keys deserialize
/// as blank so partially filled forms can be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub first_name: String,
    pub middle_initial: String,
    pub last_name: String,
    pub email: String,
    /// Date of birth as entered in a date input (`YYYY-MM-DD`).
    pub dob: String,
    pub address: String,
    pub tier: String,
    pub billing: String,
}

impl FormValues {
    /// Read a field by name.
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::FirstName => &self.first_name,
            FieldName::MiddleInitial => &self.middle_initial,
            FieldName::LastName => &self.last_name,
            FieldName::Email => &self.email,
            FieldName::Dob => &self.dob,
            FieldName::Address => &self.address,
            FieldName::Tier => &self.tier,
            FieldName::Billing => &self.billing,
        }
    }

    /// Overwrite a field by name, returning the previous value.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) -> String {
        let slot = match field {
            FieldName::FirstName => &mut self.first_name,
            FieldName::MiddleInitial => &mut self.middle_initial,
            FieldName::LastName => &mut self.last_name,
            FieldName::Email => &mut self.email,
            FieldName::Dob => &mut self.dob,
            FieldName::Address => &mut self.address,
            FieldName::Tier => &mut self.tier,
            FieldName::Billing => &mut self.billing,
        };
        std::mem::replace(slot, value.into())
    }
}
