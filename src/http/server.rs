//! HTTP pipeline assembly and server.
//!
//! # Responsibilities
//! - Resolve nothing at request time: every stage is built from `AppConfig` once
//! - Wire the stages in their fixed order
//! - Bind the pipeline to a listener and shut down gracefully
//!
//! # Layer order (outermost first)
//! ```text
//! request id → trace → propagate id → CORP (+ CORS outside production)
//!   → error responder → catch panic → body limit → parse cookies
//!   → anti-forgery guard → dispatcher (/api/*, restore, not-found fallback)
//! ```

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::errors::responder::{panic_to_fault, respond_errors, ErrorResponder};
use crate::http::request::{parse_request, propagate_request_id_layer, set_request_id_layer};
use crate::routing::dispatcher;
use crate::security::{headers, protect, CsrfGuard};

/// Assemble the full pipeline around an external route table.
///
/// `routes` is mounted under `/api`; its paths are given without the prefix.
pub fn build_pipeline(config: &AppConfig, routes: Router) -> Router {
    let environment = config.environment;
    let guard = Arc::new(CsrfGuard::new(environment, &config.csrf));
    let responder = ErrorResponder::new(environment);

    let router = dispatcher(routes)
        .layer(middleware::from_fn_with_state(guard, protect))
        .layer(middleware::from_fn(parse_request))
        .layer(DefaultBodyLimit::max(config.limits.json_body_bytes))
        .layer(CatchPanicLayer::custom(panic_to_fault))
        .layer(middleware::from_fn_with_state(responder, respond_errors));

    headers::apply(router, environment)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

/// HTTP server hosting the pipeline.
pub struct AppServer {
    router: Router,
    config: AppConfig,
}

impl AppServer {
    pub fn new(config: AppConfig, routes: Router) -> Self {
        let router = build_pipeline(&config, routes);
        Self { router, config }
    }

    /// Run until Ctrl-C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled pipeline, for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
