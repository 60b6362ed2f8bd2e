//! Terminal error responder.
//!
//! Sits outside every stage that can raise a fault. On the way out it looks for a
//! parked [`Fault`] in the response extensions, classifies it, logs it, and replaces
//! the body with the final [`ErrorRecord`]. Headers already attached by inner
//! layers (cookies, security headers) are kept.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::errors::classify::FaultChain;
use crate::errors::fault::Fault;
use crate::http::X_REQUEST_ID;

pub const DEFAULT_TITLE: &str = "Server Error";

/// The JSON body of every failing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Always serialized; `null` in production.
    pub stack: Option<String>,
}

impl ErrorRecord {
    pub fn from_fault(fault: &Fault, expose_stack: bool) -> Self {
        Self {
            title: fault.title().unwrap_or(DEFAULT_TITLE).to_string(),
            message: fault.message().to_string(),
            errors: fault.errors().map(<[String]>::to_vec),
            stack: expose_stack.then(|| fault.stack()),
        }
    }
}

/// Classifies and serializes faults. Holds the environment it was built with.
#[derive(Clone, Debug)]
pub struct ErrorResponder {
    environment: Environment,
    chain: Arc<FaultChain>,
}

impl ErrorResponder {
    pub fn new(environment: Environment) -> Self {
        Self::with_chain(environment, FaultChain::standard())
    }

    pub fn with_chain(environment: Environment, chain: FaultChain) -> Self {
        Self {
            environment,
            chain: Arc::new(chain),
        }
    }

    /// Run the classifier chain and produce the final status and record.
    pub fn resolve(&self, fault: Fault) -> (StatusCode, ErrorRecord, Fault) {
        let fault = self.chain.classify(fault);
        let status = fault.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let record = ErrorRecord::from_fault(&fault, !self.environment.is_production());
        (status, record, fault)
    }

    /// Replace a response carrying a parked fault with the classified error record.
    /// Responses without a fault are returned untouched.
    pub fn finish(&self, response: Response, request_id: &str) -> Response {
        let (mut parts, body) = response.into_parts();
        let fault = match parts.extensions.remove::<Fault>() {
            Some(fault) => fault,
            None => return Response::from_parts(parts, body),
        };

        let (status, record, fault) = self.resolve(fault);
        log_fault(&fault, status, request_id);

        let body = match serde_json::to_vec(&record) {
            Ok(bytes) => Body::from(bytes),
            Err(e) => {
                // Cannot happen for this record shape.
                tracing::error!(error = %e, "Failed to serialize error record");
                Body::from(r#"{"title":"Server Error","message":"","stack":null}"#)
            }
        };

        parts.status = status;
        parts.headers.remove(header::CONTENT_LENGTH);
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Response::from_parts(parts, body)
    }
}

fn log_fault(fault: &Fault, status: StatusCode, request_id: &str) {
    if status.is_server_error() {
        tracing::error!(
            request_id = %request_id,
            status = status.as_u16(),
            kind = ?fault.kind(),
            stack = %fault.stack(),
            "{}",
            fault
        );
    } else {
        tracing::warn!(
            request_id = %request_id,
            status = status.as_u16(),
            kind = ?fault.kind(),
            "{}",
            fault
        );
    }
}

/// Middleware wrapping the inner pipeline with the terminal responder.
pub async fn respond_errors(
    State(responder): State<ErrorResponder>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(request).await;
    responder.finish(response, &request_id)
}

/// Converts a panic caught inside the pipeline into an unclassified fault.
pub fn panic_to_fault(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    Fault::internal(detail).into_response()
}
