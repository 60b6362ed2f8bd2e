//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0, bind address parses)
//! - Validate cookie and header names are usable on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::AppConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("limits.json_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("csrf.{field} `{value}` is not a valid cookie name")]
    CookieName { field: &'static str, value: String },

    #[error("csrf.secret_cookie and csrf.token_cookie must differ")]
    SameCookieNames,

    #[error("csrf.headers must name at least one header")]
    NoTokenHeaders,

    #[error("csrf.headers entry `{0}` is not a valid header name")]
    HeaderName(String),
}

/// Check an [`AppConfig`] for semantic errors, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.limits.json_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    for (field, value) in [
        ("secret_cookie", &config.csrf.secret_cookie),
        ("token_cookie", &config.csrf.token_cookie),
    ] {
        if !is_cookie_name(value) {
            errors.push(ValidationError::CookieName {
                field,
                value: value.clone(),
            });
        }
    }

    if config.csrf.secret_cookie == config.csrf.token_cookie {
        errors.push(ValidationError::SameCookieNames);
    }

    if config.csrf.headers.is_empty() {
        errors.push(ValidationError::NoTokenHeaders);
    }

    for header in &config.csrf.headers {
        if HeaderName::try_from(header.as_str()).is_err() {
            errors.push(ValidationError::HeaderName(header.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// RFC 6265 token characters.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"'
                        | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
                )
        })
}
