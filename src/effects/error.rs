//! Errors raised while firing transitions.

use thiserror::Error;

/// Failure reported by an observer, either returned directly or carried by
/// a rejected deferred.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ObserverError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ObserverError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors that can occur when firing a transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("transition '{transition}' is invalid in current state '{state}'")]
    InvalidTransition {
        transition: String,
        from: String,
        state: String,
    },

    #[error(
        "transition '{transition}' from '{from}' to '{to}' is invalid while a previous \
         transition is still in progress (state '{state}')"
    )]
    PendingTransition {
        transition: String,
        from: String,
        to: String,
        state: String,
    },

    #[error("observer failed: {0}")]
    Observer(#[from] ObserverError),
}

/// Details handed to the invalid and pending transition handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionFault {
    /// Transition that was requested
    pub transition: String,
    /// State the transition was requested from
    pub from: String,
    /// Resolved destination, `None` when no target could be resolved
    pub to: Option<String>,
    /// Machine state when the request was rejected
    pub state: String,
}

impl TransitionFault {
    pub fn invalid(&self) -> FsmError {
        FsmError::InvalidTransition {
            transition: self.transition.clone(),
            from: self.from.clone(),
            state: self.state.clone(),
        }
    }

    pub fn pending(&self) -> FsmError {
        FsmError::PendingTransition {
            transition: self.transition.clone(),
            from: self.from.clone(),
            to: self.to.clone().unwrap_or_default(),
            state: self.state.clone(),
        }
    }
}
