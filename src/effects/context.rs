//! Context handed to every lifecycle observer.

use crate::effects::machine::StateMachine;
use std::fmt;

/// Per-attempt record of the transition being executed.
///
/// Created when a transition starts and dropped when it settles. `event`
/// names the lifecycle event currently being dispatched.
pub struct TransitionContext<D, A> {
    pub transition: String,
    pub from: String,
    pub to: String,
    pub event: String,
    fsm: StateMachine<D, A>,
}

impl<D, A> TransitionContext<D, A> {
    pub(crate) fn new(fsm: StateMachine<D, A>, transition: &str, from: &str, to: &str) -> Self {
        Self {
            transition: transition.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            event: String::new(),
            fsm,
        }
    }

    /// The machine executing this transition.
    pub fn fsm(&self) -> &StateMachine<D, A> {
        &self.fsm
    }

    /// Whether the transition moves to a different state.
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

impl<D, A> Clone for TransitionContext<D, A> {
    fn clone(&self) -> Self {
        Self {
            transition: self.transition.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            event: self.event.clone(),
            fsm: self.fsm.clone(),
        }
    }
}

impl<D, A> fmt::Debug for TransitionContext<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionContext")
            .field("transition", &self.transition)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
