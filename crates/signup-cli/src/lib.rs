//! # signup-cli: Signup Form Command-Line Interface
//!
//! Drives the sign-up stack from a terminal: the same schema, verifier,
//! place lookup, and orchestrator a form host would use, fed from a form
//! file instead of keystrokes.
//!
//! ## Subcommands
//!
//! - `check`: Schema-validate a form file
//! - `verify-email`: Ask the email verification service about one address
//! - `lookup-place`: Resolve a place id to its canonical address
//! - `submit`: Run a form through the orchestrator and store it
//!
//! ## Crate Policy
//!
//! - Argument parsing lives next to each handler; `main.rs` only dispatches.
//! - Handlers delegate to the library crates. No validation rules here.

pub mod check;
pub mod form_file;
pub mod lookup_place;
pub mod submit;
pub mod verify_email;
