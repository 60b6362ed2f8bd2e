//! The fault value carried through the pipeline.
//!
//! Handlers and pipeline stages return `Result<_, Fault>`. A fault is never
//! rendered by the code that raises it: converting it into a response only parks
//! it in the response extensions, where the error responder picks it up, runs the
//! classifier chain over it and serializes the final record.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::responder::ErrorRecord;
use crate::validation::{ValidationFailure, Violation};

pub const NOT_FOUND_TITLE: &str = "Resource Not Found";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource couldn't be found.";

/// Where a fault came from. Classifier stages branch on this, never on strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// No route matched the request.
    NotFound,
    /// The data-validation layer rejected the input.
    Validation(Vec<Violation>),
    /// Anti-forgery token missing or mismatched.
    Csrf,
    /// A request the pipeline could not parse (malformed JSON, oversized body).
    BadRequest,
    /// Anything else.
    Unclassified,
}

/// A request-scoped failure.
#[derive(Debug, Clone)]
pub struct Fault {
    kind: FaultKind,
    status: Option<StatusCode>,
    title: Option<String>,
    message: String,
    errors: Option<Vec<String>>,
    /// Unresolved until something renders it.
    backtrace: Arc<Backtrace>,
}

impl Fault {
    /// An unclassified fault. Renders as 500 "Server Error" unless a status or title
    /// is attached.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::build(FaultKind::Unclassified, None, None, message.into())
    }

    /// A fault with an explicit status and title, for handlers that raise a
    /// deliberately classified error.
    pub fn new(status: StatusCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(
            FaultKind::Unclassified,
            Some(status),
            Some(title.into()),
            message.into(),
        )
    }

    /// The fault raised when no route matched.
    pub fn not_found() -> Self {
        Self::build(
            FaultKind::NotFound,
            Some(StatusCode::NOT_FOUND),
            Some(NOT_FOUND_TITLE.to_string()),
            NOT_FOUND_MESSAGE.to_string(),
        )
        .with_errors(vec![NOT_FOUND_MESSAGE.to_string()])
    }

    /// Anti-forgery validation failure.
    pub fn csrf(message: impl Into<String>) -> Self {
        Self::build(
            FaultKind::Csrf,
            Some(StatusCode::FORBIDDEN),
            Some("Forbidden".to_string()),
            message.into(),
        )
    }

    /// The request body could not be accepted. The title follows the status
    /// (`Payload Too Large` for 413).
    pub fn bad_request(status: StatusCode, message: impl Into<String>) -> Self {
        let title = status.canonical_reason().unwrap_or("Bad Request");
        Self::build(
            FaultKind::BadRequest,
            Some(status),
            Some(title.to_string()),
            message.into(),
        )
    }

    fn build(
        kind: FaultKind,
        status: Option<StatusCode>,
        title: Option<String>,
        message: String,
    ) -> Self {
        Self {
            kind,
            status,
            title,
            message,
            errors: None,
            backtrace: Arc::new(Backtrace::force_capture()),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn kind(&self) -> &FaultKind {
        &self.kind
    }

    /// Status attached so far, if any. The responder falls back to 500.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> Option<&[String]> {
        self.errors.as_deref()
    }

    /// Backtrace captured where the fault was raised, symbolized on each call.
    pub fn stack(&self) -> String {
        self.backtrace.to_string()
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}: {}", title, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for Fault {}

impl From<ValidationFailure> for Fault {
    fn from(failure: ValidationFailure) -> Self {
        let message = failure.to_string();
        Self::build(
            FaultKind::Validation(failure.into_violations()),
            None,
            None,
            message,
        )
    }
}

impl IntoResponse for Fault {
    /// Renders a production-safe record (no stack) and parks the fault in the
    /// response extensions. Inside the pipeline the error responder replaces this
    /// body with the classified one.
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let record = ErrorRecord::from_fault(&self, false);
        let mut response = (status, Json(record)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
