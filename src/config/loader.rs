//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::environment::{Environment, ENV_VAR};
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: `{value}`")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment overrides, and
/// validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `APP_ENV`, `PORT`, `DATABASE_URL` and `DB_FILE` on top of a loaded config.
///
/// `lookup` abstracts the process environment so overrides can be tested without
/// mutating it.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_VAR) {
        config.environment = Environment::resolve(Some(&value));
    }

    if let Some(value) = lookup("PORT") {
        let port = value.trim().parse::<u16>().map_err(|_| ConfigError::Env {
            var: "PORT",
            value: value.clone(),
        })?;
        config.listener.set_port(port);
    }

    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = Some(url);
    }

    if let Some(file) = lookup("DB_FILE") {
        config.database.file = file;
    }

    Ok(config)
}
