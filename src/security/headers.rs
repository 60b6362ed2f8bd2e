//! Response header hardening.
//!
//! # Responsibilities
//! - `Cross-Origin-Resource-Policy: cross-origin` on every response
//! - Permissive CORS outside production (UI served from another origin)
//!
//! # Design Decisions
//! - Both layers sit outside routing so error responses carry them too
//! - Production gets no CORS layer at all; same-origin is assumed
//! - CORS never allows credentials together with a wildcard origin

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Environment;

pub const CROSS_ORIGIN_RESOURCE_POLICY: &str = "cross-origin-resource-policy";

/// Resources are embeddable from any origin; state-changing abuse is stopped by the
/// anti-forgery guard, not by this header.
pub fn resource_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(CROSS_ORIGIN_RESOURCE_POLICY),
        HeaderValue::from_static("cross-origin"),
    )
}

/// CORS layer for the given environment; `None` in production.
pub fn cors_layer(environment: Environment) -> Option<CorsLayer> {
    if environment.is_production() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers(AllowHeaders::mirror_request()),
    )
}

/// Apply the header policy to a router.
pub fn apply(router: Router, environment: Environment) -> Router {
    let router = match cors_layer(environment) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(resource_policy_layer())
}
