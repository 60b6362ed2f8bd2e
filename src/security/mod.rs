//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORP on every response, CORS outside production)
//!     → csrf.rs (issue secret cookie, validate echoed token on writes)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Every decision reads the injected Environment, never process state
//! - Fail closed: a write without a verifiable token never reaches a handler

pub mod csrf;
pub mod headers;
pub mod token;

pub use csrf::{protect, CsrfGuard, CsrfToken};
