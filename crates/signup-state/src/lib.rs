//! # signup-state: Validation Orchestration
//!
//! Implements the stateful half of the sign-up form: the email validation
//! state machine, the mapping-widget lifecycle, and the orchestrator that
//! merges both with the synchronous field schema into a submit decision.
//!
//! ## State Machines
//!
//! - **Email** (`email.rs`): `Unknown → Validating → Valid | Invalid`, with
//!   generation-tagged requests so out-of-order completions are discarded.
//!
//! - **Address** (`address.rs`): `Loading → Loaded | Failed` script status,
//!   bound selection handle, and selection-generation tagging.
//!
//! - **Orchestrator** (`orchestrator.rs`): the single owner of form state.
//!   Only the field schema gates submission.
//!
//! - **Sinks** (`sink.rs`): where accepted records go.

pub mod address;
pub mod email;
pub mod orchestrator;
pub mod sink;

pub use address::{
    resolve_place, AddressAutocomplete, AddressResolutionOutcome, ResolvedAddress,
    ScriptLoadStatus,
};
pub use email::{Completion, EmailValidation, EmailValidationState, InvalidReason, RequestTag};
pub use orchestrator::{
    FormState, Notice, NoticeLevel, OrchestratorSettings, SignupOrchestrator, SubmitError,
};
pub use sink::{JsonFileSink, SinkError, StoredSignup, SubmissionSink};
