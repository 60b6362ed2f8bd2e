//! Data-validation layer contract.
//!
//! Request payloads implement [`Validate`]; a rejected payload yields a
//! [`ValidationFailure`] listing every field violation, which converts into a
//! [`Fault`](crate::errors::Fault) the classifier recognises.
//!
//! # Design Decisions
//! - Every violation is reported, never just the first
//! - Violation order follows the order rules were declared

pub mod extract;

use std::fmt;

pub use extract::Valid;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The data-validation layer rejected a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{}", sep, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Implemented by payloads checked before they reach a handler.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationFailure>;
}

/// Collects violations across several checks.
///
/// ```
/// use authgate::validation::Rules;
///
/// let email = "not-an-email";
/// let result = Rules::new()
///     .check(email.contains('@'), "email", "Please provide a valid email.")
///     .check(!email.is_empty(), "email", "Email is required.")
///     .finish();
/// assert_eq!(result.unwrap_err().violations().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Rules {
    violations: Vec<Violation>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field` unless `ok` holds.
    pub fn check(mut self, ok: bool, field: &str, message: &str) -> Self {
        if !ok {
            self.violations.push(Violation::new(field, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationFailure> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(self.violations))
        }
    }
}
