//! # signup-client: Typed clients for the sign-up form's remote collaborators
//!
//! Provides typed, failure-normalizing access to:
//! - **Email verification**: deliverability check of a single address
//!   ([`EmailVerificationClient`], behind the [`EmailVerifier`] seam)
//! - **Place lookup**: address suggestions and place details
//!   ([`PlacesClient`]), plus the selection handle an autocomplete widget
//!   binds to ([`AutocompleteHandle`], behind the [`PlaceSource`] seam)
//!
//! ## Failure Model
//!
//! Remote calls never escape as errors into form state. The email verifier
//! always returns a [`VerificationOutcome`]; place lookups return a typed
//! [`PlacesError`] the caller folds into its resolution outcome. Only client
//! construction can fail with [`ClientError`].
//!
//! ## Configuration
//!
//! [`ServiceConfig::from_env`] reads base URLs and API keys from the
//! environment. Missing API keys disable the dependent feature rather than
//! failing startup.

pub mod config;
pub mod email;
pub mod error;
pub mod places;
pub(crate) mod retry;

pub use config::{ConfigError, ServiceConfig};
pub use email::{
    Deliverability, EmailReport, EmailVerificationClient, EmailVerifier, VerificationFailure,
    VerificationOutcome,
};
pub use error::ClientError;
pub use places::{
    AddressComponent, AutocompleteHandle, AutocompleteOptions, Place, PlaceSource, PlacesClient,
    PlacesError, Prediction,
};
