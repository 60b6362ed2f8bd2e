//! Backend entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ─────────────▶ request id ─▶ trace ─▶ CORP / CORS ─▶ error responder
//!                                                              │
//!                     ┌────────────────────────────────────────┘
//!                     ▼
//!               parse cookies ─▶ anti-forgery guard ─▶ /api dispatcher ─▶ route table
//!                                        │                    │
//!                                      Fault               not found
//!                                        └──────────┬─────────┘
//!                                                   ▼
//!                               classify (validation, ...) ─▶ JSON error record
//! ```
//!
//! The domain route table is not part of this binary; it serves the pipeline with
//! only the built-in token restore endpoint mounted.

use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;

use authgate::config::load_config;
use authgate::observability::logging;
use authgate::AppServer;

#[derive(Parser, Debug)]
#[command(name = "authgate", version, about = "Request-handling pipeline server")]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding config and PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    logging::init(config.environment);
    if let Some(port) = cli.port {
        config.listener.set_port(port);
    }

    tracing::info!(
        environment = %config.environment,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = AppServer::new(config, Router::new());
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
