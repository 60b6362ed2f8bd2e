//! Fault classification stages.
//!
//! # Stage order
//! ```text
//! no route matched ──▶ not_found() ──┐
//!                                     ▼
//! handler / guard fault ──────▶ FaultChain::classify (fold over stages)
//!                                     ▼
//!                              ErrorResponder (terminal)
//! ```
//!
//! Stages are total functions `Fault -> Fault`. A stage that does not recognise a
//! fault returns it untouched; no stage can drop or fail on a fault.

use axum::http::StatusCode;

use crate::errors::fault::{Fault, FaultKind};

pub const VALIDATION_TITLE: &str = "Validation error";

/// A single classification stage.
pub trait Classifier: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Inspect a fault and return it, possibly rewritten.
    fn classify(&self, fault: Fault) -> Fault;
}

/// Rewrites faults raised by the data-validation layer: every field violation
/// becomes one entry of `errors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationClassifier;

impl Classifier for ValidationClassifier {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn classify(&self, fault: Fault) -> Fault {
        if !matches!(fault.kind(), FaultKind::Validation(_)) {
            return fault;
        }

        let messages: Vec<String> = match fault.kind() {
            FaultKind::Validation(violations) => {
                violations.iter().map(|v| v.message().to_string()).collect()
            }
            _ => Vec::new(),
        };

        let errors = if messages.is_empty() {
            vec![fault.message().to_string()]
        } else {
            messages
        };
        let status = fault.status().unwrap_or(StatusCode::BAD_REQUEST);

        fault
            .with_errors(errors)
            .with_title(VALIDATION_TITLE)
            .with_status(status)
    }
}

/// Ordered classification stages applied before the terminal responder.
pub struct FaultChain {
    stages: Vec<Box<dyn Classifier>>,
}

impl FaultChain {
    pub fn new(stages: Vec<Box<dyn Classifier>>) -> Self {
        Self { stages }
    }

    /// The chain installed by the pipeline.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(ValidationClassifier)])
    }

    pub fn classify(&self, fault: Fault) -> Fault {
        self.stages.iter().fold(fault, |fault, stage| {
            tracing::trace!(stage = stage.name(), "Classifying fault");
            stage.classify(fault)
        })
    }
}

impl Default for FaultChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for FaultChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

/// Router fallback: reached only when no route matched.
pub async fn not_found() -> Fault {
    Fault::not_found()
}
