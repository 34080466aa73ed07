//! Per-request authentication gate.
//!
//! Framework independent: the HTTP layer translates a request into a
//! [`GateRequest`] and a [`GateOutcome`] back into a response.

pub mod context;
pub mod outcome;
pub mod steps;

pub use context::SecurityContext;
pub use outcome::{GateOutcome, GateRejection, RejectionStatus, StepError};
pub use steps::{AuthenticationGate, GateRequest};
