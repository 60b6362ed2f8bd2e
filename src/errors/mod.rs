//! Error classification subsystem.
//!
//! # Data Flow
//! ```text
//! route miss            → classify.rs (not_found fallback raises Fault)
//! guard / handler fault → fault.rs (parked in response extensions)
//! panic                 → responder.rs (panic_to_fault)
//!     → classify.rs (FaultChain: validation stage, ...)
//!     → responder.rs (status, log, ErrorRecord JSON)
//! ```
//!
//! # Design Decisions
//! - Faults are values, never rendered where they are raised
//! - One JSON shape for every failure
//! - Stack traces only leave the process outside production

pub mod classify;
pub mod fault;
pub mod responder;

pub use classify::{not_found, Classifier, FaultChain, ValidationClassifier};
pub use fault::{Fault, FaultKind};
pub use responder::{respond_errors, ErrorRecord, ErrorResponder};
