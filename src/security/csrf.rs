//! Double-submit-cookie anti-forgery guard.
//!
//! # Per-request flow
//! ```text
//! cookie secret valid? ── no ──▶ generate, mark for Set-Cookie (HTTP-only)
//!        │
//! method is GET/HEAD/OPTIONS? ── no ──▶ header token verifies? ── no ──▶ Fault (403)
//!        │                                        │
//!        ▼                                       yes
//! attach CsrfToken capability ◀───────────────────┘
//!        ▼
//! run inner pipeline
//!        ▼
//! token issued by a handler? ── yes ──▶ Set-Cookie readable token
//! ```

use std::sync::{Arc, OnceLock};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderName, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::{CsrfConfig, Environment};
use crate::errors::Fault;
use crate::http::request::RequestContext;
use crate::http::response::{SameSite, SetCookie};
use crate::security::token::Secret;

/// Guard configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    environment: Environment,
    secret_cookie: String,
    token_cookie: String,
    headers: Vec<HeaderName>,
}

impl CsrfGuard {
    /// Header names that fail to parse are dropped; config validation rejects them
    /// before a guard is ever built from a loaded config.
    pub fn new(environment: Environment, config: &CsrfConfig) -> Self {
        let headers = config
            .headers
            .iter()
            .filter_map(|h| HeaderName::try_from(h.as_str()).ok())
            .collect();

        Self {
            environment,
            secret_cookie: config.secret_cookie.clone(),
            token_cookie: config.token_cookie.clone(),
            headers,
        }
    }

    /// Methods that only read state skip token validation.
    pub fn is_safe(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Existing secret from the cookie jar, or a fresh one (`true` = must be set).
    fn secret_for(&self, context: &RequestContext) -> (Secret, bool) {
        match context.cookies.get(&self.secret_cookie).and_then(Secret::parse) {
            Some(secret) => (secret, false),
            None => (Secret::generate(), true),
        }
    }

    /// Validate the echoed token of a state-changing request.
    fn verify(&self, request: &Request, secret: &Secret, fresh: bool) -> Result<(), Fault> {
        let supplied = self
            .headers
            .iter()
            .find_map(|name| request.headers().get(name))
            .and_then(|v| v.to_str().ok());

        let Some(token) = supplied else {
            return Err(Fault::csrf("missing csrf token"));
        };

        // A secret minted for this request cannot have been used to derive any token.
        if fresh || !secret.verify(token) {
            return Err(Fault::csrf("invalid csrf token"));
        }

        Ok(())
    }

    fn cookie_flags(&self, cookie: SetCookie) -> SetCookie {
        let production = self.environment.is_production();
        cookie
            .path("/")
            .secure(production)
            .same_site(production.then_some(SameSite::Lax))
    }

    fn secret_cookie(&self, secret: &Secret) -> SetCookie {
        self.cookie_flags(SetCookie::new(&self.secret_cookie, secret.as_str()))
            .http_only(true)
    }

    fn token_cookie(&self, token: &str) -> SetCookie {
        self.cookie_flags(SetCookie::new(&self.token_cookie, token))
    }
}

/// Token-issuing capability attached to every request that passed the guard.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    secret: Secret,
    issued: Arc<OnceLock<String>>,
}

impl CsrfToken {
    fn new(secret: Secret) -> Self {
        Self {
            secret,
            issued: Arc::new(OnceLock::new()),
        }
    }

    /// The token for this request. The first call derives it and arranges for the
    /// readable cookie to be set on the response; later calls return the same value.
    pub fn token(&self) -> String {
        self.issued.get_or_init(|| self.secret.issue()).clone()
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| Fault::internal("anti-forgery guard is not installed"))
    }
}

/// Middleware enforcing the guard.
pub async fn protect(
    State(guard): State<Arc<CsrfGuard>>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::of(&request);
    let (secret, fresh) = guard.secret_for(&context);

    let verdict = if CsrfGuard::is_safe(request.method()) {
        Ok(())
    } else {
        guard.verify(&request, &secret, fresh)
    };

    let mut response = match verdict {
        Ok(()) => {
            let capability = CsrfToken::new(secret.clone());
            let issued = capability.issued.clone();
            request.extensions_mut().insert(capability);

            let mut response = next.run(request).await;
            if let Some(token) = issued.get() {
                guard.token_cookie(token).append_to(&mut response);
            }
            response
        }
        Err(fault) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = fault.message(),
                "Anti-forgery check failed"
            );
            fault.into_response()
        }
    };

    if fresh {
        guard.secret_cookie(&secret).append_to(&mut response);
    }

    response
}
