//! Request parsing and per-request context.
//!
//! # Responsibilities
//! - Parse the `Cookie` header once per request
//! - Attach a [`RequestContext`] to the request extensions
//! - Generate and propagate request IDs
//!
//! # Design Decisions
//! - Context is created at request entry and dropped with the request
//! - Malformed cookie pairs are skipped, never rejected
//! - JSON bodies are parsed lazily by the `Valid<T>` extractor

use std::collections::HashMap;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Cookies sent with a request.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    cookies: HashMap<String, String>,
}

impl Cookies {
    /// Parse every `Cookie` header on the request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();

        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    // First occurrence wins, matching browser ordering (most specific path first).
                    cookies
                        .entry(name.to_string())
                        .or_insert_with(|| value.trim().trim_matches('"').to_string());
                }
            }
        }

        Self { cookies }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Per-request state built at pipeline entry.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub cookies: Cookies,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            cookies: Cookies::from_headers(headers),
        }
    }

    /// The context attached by [`parse_request`], or one built on the spot.
    pub fn of(request: &Request) -> Self {
        request
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(request.headers()))
    }
}

/// Middleware: parse cookies into a [`RequestContext`].
pub async fn parse_request(mut request: Request, next: Next) -> Response {
    let context = RequestContext::from_headers(request.headers());
    tracing::trace!(cookies = context.cookies.len(), "Request context attached");
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Layer assigning a UUID v4 request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}
