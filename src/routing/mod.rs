//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (/api/* → external route table, /api/csrf/restore built in)
//!     → no match → errors::not_found fallback
//! ```
//!
//! # Design Decisions
//! - The pipeline owns exactly one endpoint (token restore)
//! - Domain routes are supplied from outside as an axum Router
//! - Routes are fixed at startup, immutable at runtime

pub mod restore;
pub mod router;

pub use restore::{restore_csrf, RestoreBody};
pub use router::{dispatcher, API_PREFIX, RESTORE_PATH};
