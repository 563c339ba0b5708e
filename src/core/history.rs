//! Committed transition history.
//!
//! An immutable record of the state changes a machine has committed,
//! appended to by the history plugin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Name of the transition that fired
    pub transition: String,
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// When the new state was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// `record` returns a new history with the transition appended and leaves
/// the receiver untouched.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         transition: "walk".to_string(),
///         from: "idle".to_string(),
///         to: "walking".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         transition: "run".to_string(),
///         from: "walking".to_string(),
///         to: "running".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec!["idle", "walking", "running"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first source, then each destination.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(transition: &str, from: &str, to: &str) -> StateTransition {
        StateTransition {
            transition: transition.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(step("walk", "idle", "walking"));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(step("walk", "idle", "walking"))
            .record(step("stop", "walking", "idle"));

        assert_eq!(history.get_path(), vec!["idle", "walking", "idle"]);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let history = StateHistory::new().record(step("walk", "idle", "walking"));

        std::thread::sleep(std::time::Duration::from_millis(10));

        let history = history.record(step("stop", "walking", "idle"));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(step("walk", "idle", "walking"));
        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(step("walk", "idle", "walking"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
