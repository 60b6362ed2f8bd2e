//! Token restore endpoint.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::security::CsrfToken;

/// Body of `GET /api/csrf/restore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreBody {
    #[serde(rename = "XSRF-Token")]
    pub token: String,
}

/// Hand the caller a fresh token. Issuing it also schedules the readable cookie.
///
/// Status and body go out as one value; nothing else writes to this response.
pub async fn restore_csrf(csrf: CsrfToken) -> (StatusCode, Json<RestoreBody>) {
    let token = csrf.token();
    tracing::debug!("Anti-forgery token restored");
    (StatusCode::OK, Json(RestoreBody { token }))
}
