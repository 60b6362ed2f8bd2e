//! Deployment environment resolution.
//!
//! The environment is resolved exactly once at startup and then handed to every
//! component that makes a security decision. Nothing downstream reads
//! `APP_ENV` again.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable holding the environment indicator.
pub const ENV_VAR: &str = "APP_ENV";

/// Deployment posture of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    /// Anything that is not production. Permissive CORS, diagnostics exposed.
    #[default]
    Development,
    /// Hardened cookies, no CORS layer, stack traces withheld.
    Production,
}

impl Environment {
    /// Resolve from a raw indicator. `production` selects production; an absent or
    /// unknown value stays in development.
    ///
    /// Matching is wider than an exact comparison: surrounding whitespace is trimmed
    /// and case is ignored, so ` PRODUCTION ` also hardens the process. Values such
    /// as `prod` do not.
    pub fn resolve(indicator: Option<&str>) -> Self {
        match indicator.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        Self::resolve(Some(&value))
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
