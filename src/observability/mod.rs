//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → tower_http TraceLayer (one span per request)
//!     → x-request-id (set at entry, echoed on the response)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) in production for machine parsing
//! - Request ID flows through the fault log lines

pub mod logging;
