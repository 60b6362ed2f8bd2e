//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment variables (APP_ENV, PORT, DATABASE_URL, DB_FILE)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → Environment resolved once, injected into every pipeline stage
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so a missing file means "development, port 8000"
//! - Validation separates syntactic (serde) from semantic checks

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::Environment;
pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::CsrfConfig;
pub use schema::DatabaseConfig;
pub use schema::LimitsConfig;
pub use schema::ListenerConfig;
