use crate::core::{StateHistory, StateTransition};
use crate::effects::{StateMachine, TransitionContext};
use crate::plugin::Plugin;
use chrono::Utc;
use parking_lot::Mutex;

/// Plugin recording every committed state change.
///
/// Entries are appended from the commit hook, so only transitions that
/// reach their commit step are recorded, whatever their event names.
///
/// # Example
///
/// ```rust
/// use futures::FutureExt;
/// use lifecycle_fsm::builder::{StateMachineBuilder, TransitionBuilder};
/// use lifecycle_fsm::plugin::TransitionHistory;
/// use std::sync::Arc;
///
/// let history = Arc::new(TransitionHistory::new());
/// let fsm = StateMachineBuilder::<(), ()>::new()
///     .init("idle")
///     .transition(TransitionBuilder::new().name("walk").from("idle").to("walking"))
///     .unwrap()
///     .plugin(Arc::clone(&history))
///     .build()
///     .unwrap();
///
/// fsm.init(()).now_or_never().unwrap().unwrap();
/// fsm.fire("walk", ()).now_or_never().unwrap().unwrap();
///
/// assert_eq!(history.history().get_path(), vec!["none", "idle", "walking"]);
/// ```
#[derive(Debug, Default)]
pub struct TransitionHistory {
    history: Mutex<StateHistory>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(StateHistory::new()),
        }
    }

    /// Snapshot of the transitions recorded so far.
    pub fn history(&self) -> StateHistory {
        self.history.lock().clone()
    }

    pub fn clear(&self) {
        *self.history.lock() = StateHistory::new();
    }
}

impl<D, A> Plugin<D, A> for TransitionHistory {
    fn init(&self, fsm: &StateMachine<D, A>) {
        tracing::trace!(state = %fsm.state(), "transition history attached");
    }

    fn commit(&self, context: &TransitionContext<D, A>, _args: &A) {
        let mut history = self.history.lock();
        *history = history.record(StateTransition {
            transition: context.transition.clone(),
            from: context.from.clone(),
            to: context.to.clone(),
            timestamp: Utc::now(),
        });
    }
}
