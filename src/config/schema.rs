//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the pipeline.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::Environment;

/// Root configuration for the backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment. Conditions every security decision.
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Database connection descriptor. Carried for the persistence layer, never read
    /// by the pipeline itself.
    pub database: DatabaseConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Anti-forgery cookie and header names.
    pub csrf: CsrfConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Database connection descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, used in production.
    pub url: Option<String>,

    /// Local database file, used in development.
    pub file: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            file: "db/dev.db".to_string(),
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted JSON body size in bytes.
    pub json_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            json_body_bytes: 1024 * 1024,
        }
    }
}

/// Anti-forgery cookie and header names.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// HTTP-only cookie holding the session secret.
    pub secret_cookie: String,

    /// Readable cookie carrying the token for client-side code.
    pub token_cookie: String,

    /// Request headers checked, in order, for the echoed token.
    pub headers: Vec<String>,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            secret_cookie: "_csrf".to_string(),
            token_cookie: "XSRF-TOKEN".to_string(),
            headers: vec![
                "csrf-token".to_string(),
                "xsrf-token".to_string(),
                "x-csrf-token".to_string(),
                "x-xsrf-token".to_string(),
            ],
        }
    }
}
