//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use authgate::config::{AppConfig, Environment};
use authgate::validation::{Rules, Valid, Validate, ValidationFailure};
use authgate::{build_pipeline, Fault};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Payload accepted by the sample route table.
#[derive(Debug, Deserialize)]
pub struct NewWidget {
    pub name: String,
    pub price: i64,
}

impl Validate for NewWidget {
    fn validate(&self) -> Result<(), ValidationFailure> {
        Rules::new()
            .check(!self.name.trim().is_empty(), "name", "Please provide a name.")
            .check(self.price > 0, "price", "Price must be positive.")
            .finish()
    }
}

async fn create_widget(
    State(created): State<Arc<AtomicUsize>>,
    Valid(widget): Valid<NewWidget>,
) -> (StatusCode, Json<Value>) {
    created.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({ "name": widget.name, "price": widget.price })),
    )
}

async fn fail() -> Result<Json<Value>, Fault> {
    Err(Fault::internal("database unavailable"))
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

async fn teapot() -> Fault {
    Fault::new(StatusCode::IM_A_TEAPOT, "Teapot", "short and stout")
}

/// A stand-in for the external route table. `created` counts successful writes.
pub fn route_table(created: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/widgets", post(create_widget))
        .route("/boom", get(fail))
        .route("/panic", get(explode))
        .route("/teapot", get(teapot))
        .with_state(created)
}

/// The full pipeline around the sample route table.
pub fn app(environment: Environment) -> (Router, Arc<AtomicUsize>) {
    let config = AppConfig {
        environment,
        ..AppConfig::default()
    };
    let created = Arc::new(AtomicUsize::new(0));
    (build_pipeline(&config, route_table(created.clone())), created)
}

/// A response reduced to what the tests inspect.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Full `Set-Cookie` line for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{}=", name);
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// `name=value` pair of a cookie set by this response, ready for a `Cookie` header.
    pub fn cookie_pair(&self, name: &str) -> Option<String> {
        self.set_cookie(name)
            .map(|c| c.split(';').next().unwrap_or_default().to_string())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Reply {
        status,
        headers,
        body,
    }
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// JSON POST with optional cookie and anti-forgery header.
pub fn post_json(uri: &str, body: Value, cookie: Option<&str>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(token) = token {
        builder = builder.header("xsrf-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Fetch a token from the restore endpoint with an empty cookie jar.
/// Returns `(secret cookie pair, token)`.
pub async fn restore(app: &Router) -> (String, String) {
    let reply = send(app, get_request("/api/csrf/restore")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cookie = reply.cookie_pair("_csrf").expect("secret cookie issued");
    let token = reply.body["XSRF-Token"].as_str().unwrap().to_string();
    (cookie, token)
}
