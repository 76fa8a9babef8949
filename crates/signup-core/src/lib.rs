//! # signup-core: Foundational Types for the Signup Stack
//!
//! Defines the raw form record collected from a user, the closed sets of
//! values the form accepts, and the synchronous schema validator that decides
//! which fields are in error. Every other crate in the workspace depends on
//! `signup-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Raw values stay raw.** [`FormValues`] holds exactly what the user
//!    typed. Parsing into [`Tier`], [`Billing`], or a calendar date happens in
//!    the validator, never on assignment, so a half-typed form is always
//!    representable.
//!
//! 2. **One field vocabulary.** [`FieldName`] is the single enumeration of
//!    form fields. Errors, updates, and serialization all key on it.
//!
//! 3. **Validation is pure.** [`schema::validate`] performs no I/O and is
//!    deterministic. Remote checks (email deliverability, address lookup)
//!    live in other crates and never write into [`FieldErrors`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `signup-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod form;
pub mod schema;

pub use error::FormError;
pub use form::{Billing, FieldName, FormValues, Tier};
pub use schema::{is_email_syntax, validate, FieldErrors};
