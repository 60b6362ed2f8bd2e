//! Route dispatch.
//!
//! # Responsibilities
//! - Mount the external route table under `/api`
//! - Add the built-in token restore endpoint
//! - Install the not-found fallback, for unknown paths and for known paths hit
//!   with the wrong method
//!
//! # Design Decisions
//! - Overlapping paths between the external table and built-ins panic at startup
//!   (axum merge semantics), never silently shadow each other

use axum::{routing::get, Router};

use crate::errors::not_found;
use crate::routing::restore::restore_csrf;

pub const API_PREFIX: &str = "/api";

/// Path of the restore endpoint, relative to [`API_PREFIX`].
pub const RESTORE_PATH: &str = "/csrf/restore";

/// Build the dispatching router around an external route table.
pub fn dispatcher(routes: Router) -> Router {
    let api = Router::new()
        .route(RESTORE_PATH, get(restore_csrf))
        .merge(routes)
        .method_not_allowed_fallback(not_found);

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}
