//! Build errors for state machine and transition builders.

use crate::builder::validation::ConfigViolation;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition name not specified. Call .name(name) before .build()")]
    MissingTransitionName,

    #[error("Invalid configuration: {}", summarize(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("Malformed machine spec: {0}")]
    Spec(#[from] serde_json::Error),
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
