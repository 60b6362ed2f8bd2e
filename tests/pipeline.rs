//! Behaviour of the assembled pipeline, driven without a socket.

use std::sync::atomic::Ordering;

use authgate::config::Environment;
use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use serde_json::json;

mod common;

use common::{app, get_request, get_with_cookie, post_json, restore, send};

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/nonexistent")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["title"], "Resource Not Found");
    assert_eq!(reply.body["errors"].as_array().unwrap().len(), 1);
    assert!(reply.body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_api_path_is_not_found() {
    let (app, _) = app(Environment::Production);

    let reply = send(&app, get_request("/api/does/not/exist")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["title"], "Resource Not Found");
    assert!(reply.body["stack"].is_null());
}

#[tokio::test]
async fn test_wrong_method_on_known_path_is_not_found() {
    let (app, created) = app(Environment::Development);

    let reply = send(&app, get_request("/api/widgets")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["title"], "Resource Not Found");
    assert!(reply.body.get("stack").is_some());
    assert!(reply.headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_post_to_restore_endpoint_is_not_found() {
    let (app, _) = app(Environment::Production);
    let (cookie, token) = restore(&app).await;

    let reply = send(
        &app,
        post_json("/api/csrf/restore", json!({}), Some(&cookie), Some(&token)),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["title"], "Resource Not Found");
    assert!(reply.body["stack"].is_null());
}

#[tokio::test]
async fn test_restore_without_cookies_issues_both_cookies() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/api/csrf/restore")).await;

    assert_eq!(reply.status, StatusCode::OK);
    let token = reply.body["XSRF-Token"].as_str().unwrap();
    assert!(!token.is_empty());

    let secret = reply.set_cookie("_csrf").expect("secret cookie");
    assert!(secret.contains("HttpOnly"));
    assert!(secret.contains("Path=/"));

    let readable = reply.set_cookie("XSRF-TOKEN").expect("readable cookie");
    assert!(!readable.contains("HttpOnly"));
    assert_eq!(reply.cookie_pair("XSRF-TOKEN").unwrap(), format!("XSRF-TOKEN={}", token));
}

#[tokio::test]
async fn test_plain_get_sets_secret_but_not_token() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/nonexistent")).await;

    assert!(reply.set_cookie("_csrf").is_some());
    assert!(reply.set_cookie("XSRF-TOKEN").is_none());
}

#[tokio::test]
async fn test_valid_secret_cookie_is_not_reissued() {
    let (app, _) = app(Environment::Development);
    let (cookie, _) = restore(&app).await;

    let reply = send(&app, get_with_cookie("/api/csrf/restore", &cookie)).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.set_cookie("_csrf").is_none());
    assert!(reply.set_cookie("XSRF-TOKEN").is_some());
}

#[tokio::test]
async fn test_post_without_token_is_forbidden() {
    let (app, created) = app(Environment::Development);
    let (cookie, _) = restore(&app).await;

    let reply = send(
        &app,
        post_json("/api/widgets", json!({"name": "gear", "price": 3}), Some(&cookie), None),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["title"], "Forbidden");
    assert_eq!(reply.body["message"], "missing csrf token");
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_post_with_mismatched_token_is_forbidden() {
    let (app, created) = app(Environment::Development);
    let (cookie, _) = restore(&app).await;
    let (_, foreign_token) = restore(&app).await;

    let reply = send(
        &app,
        post_json(
            "/api/widgets",
            json!({"name": "gear", "price": 3}),
            Some(&cookie),
            Some(&foreign_token),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["message"], "invalid csrf token");
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_post_with_token_but_no_cookie_is_forbidden() {
    let (app, created) = app(Environment::Development);
    let (_, token) = restore(&app).await;

    let reply = send(
        &app,
        post_json("/api/widgets", json!({"name": "gear", "price": 3}), None, Some(&token)),
    )
    .await;

    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    // The rejected response still hands out a fresh secret.
    assert!(reply.set_cookie("_csrf").is_some());
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_post_with_matching_token_reaches_handler() {
    let (app, created) = app(Environment::Development);
    let (cookie, token) = restore(&app).await;

    let reply = send(
        &app,
        post_json(
            "/api/widgets",
            json!({"name": "gear", "price": 3}),
            Some(&cookie),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["name"], "gear");
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_successive_restores_yield_independent_tokens() {
    let (app, created) = app(Environment::Development);
    let (cookie, first) = restore(&app).await;

    let again = send(&app, get_with_cookie("/api/csrf/restore", &cookie)).await;
    let second = again.body["XSRF-Token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    for token in [&first, &second] {
        let reply = send(
            &app,
            post_json(
                "/api/widgets",
                json!({"name": "gear", "price": 3}),
                Some(&cookie),
                Some(token),
            ),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    // A second, independent jar works with its own pair.
    let (other_cookie, other_token) = restore(&app).await;
    let reply = send(
        &app,
        post_json(
            "/api/widgets",
            json!({"name": "bolt", "price": 1}),
            Some(&other_cookie),
            Some(&other_token),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(created.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_validation_fault_lists_every_violation() {
    let (app, created) = app(Environment::Development);
    let (cookie, token) = restore(&app).await;

    let reply = send(
        &app,
        post_json(
            "/api/widgets",
            json!({"name": " ", "price": 0}),
            Some(&cookie),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["title"], "Validation error");
    assert_eq!(
        reply.body["errors"],
        json!(["Please provide a name.", "Price must be positive."])
    );
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app(Environment::Development);
    let (cookie, token) = restore(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/widgets")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .header("x-csrf-token", &token)
        .body(Body::from("{\"name\":"))
        .unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["title"], "Bad Request");
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let (app, created) = app(Environment::Development);
    let (cookie, token) = restore(&app).await;

    let name = "a".repeat(2 * 1024 * 1024);
    let reply = send(
        &app,
        post_json(
            "/api/widgets",
            json!({"name": name, "price": 1}),
            Some(&cookie),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(reply.body["title"], "Payload Too Large");
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_fault_exposes_stack_in_development() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/api/boom")).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["title"], "Server Error");
    assert_eq!(reply.body["message"], "database unavailable");
    assert!(!reply.body["stack"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_production_withholds_stack() {
    let (app, _) = app(Environment::Production);

    for path in ["/api/boom", "/nonexistent", "/api/teapot"] {
        let reply = send(&app, get_request(path)).await;
        assert!(reply.body.get("stack").is_some(), "{} has a stack key", path);
        assert!(reply.body["stack"].is_null(), "{} leaks a stack", path);
    }
}

#[tokio::test]
async fn test_panicking_handler_becomes_server_error() {
    let (app, _) = app(Environment::Production);

    let reply = send(&app, get_request("/api/panic")).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["title"], "Server Error");
    assert!(reply.body["stack"].is_null());
}

#[tokio::test]
async fn test_classified_handler_fault_keeps_status() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/api/teapot")).await;

    assert_eq!(reply.status, StatusCode::IM_A_TEAPOT);
    assert_eq!(reply.body["title"], "Teapot");
    assert_eq!(reply.body["message"], "short and stout");
    assert!(reply.body.get("errors").is_none());
}

#[tokio::test]
async fn test_resource_policy_on_success_and_error() {
    let (app, _) = app(Environment::Production);

    for path in ["/api/csrf/restore", "/nonexistent"] {
        let reply = send(&app, get_request(path)).await;
        assert_eq!(reply.headers["cross-origin-resource-policy"], "cross-origin");
    }
}

#[tokio::test]
async fn test_cors_only_in_development() {
    let request = || {
        Request::builder()
            .uri("/api/csrf/restore")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap()
    };

    let (dev, _) = app(Environment::Development);
    let reply = send(&dev, request()).await;
    assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let (prod, _) = app(Environment::Production);
    let reply = send(&prod, request()).await;
    assert!(reply.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_production_cookie_flags() {
    let (app, _) = app(Environment::Production);

    let reply = send(&app, get_request("/api/csrf/restore")).await;

    let secret = reply.set_cookie("_csrf").unwrap();
    assert!(secret.contains("Secure"));
    assert!(secret.contains("SameSite=Lax"));
    assert!(secret.contains("HttpOnly"));
}

#[tokio::test]
async fn test_development_cookie_flags() {
    let (app, _) = app(Environment::Development);

    let reply = send(&app, get_request("/api/csrf/restore")).await;

    let secret = reply.set_cookie("_csrf").unwrap();
    assert!(!secret.contains("Secure"));
    assert!(!secret.contains("SameSite"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = app(Environment::Development);

    let generated = send(&app, get_request("/nonexistent")).await;
    assert!(generated.headers.get("x-request-id").is_some());

    let request = Request::builder()
        .uri("/nonexistent")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let echoed = send(&app, request).await;
    assert_eq!(echoed.headers["x-request-id"], "abc-123");
}
