//! Request-handling pipeline for a JSON web backend.
//!
//! Cookie parsing, security headers, double-submit-cookie anti-forgery protection,
//! `/api` dispatch to an external route table, and a single JSON error contract.

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod routing;
pub mod security;
pub mod validation;

pub use config::{AppConfig, Environment};
pub use errors::{ErrorRecord, Fault};
pub use http::{build_pipeline, AppServer};
pub use security::CsrfToken;
pub use validation::{Valid, Validate, ValidationFailure};
