//! Extension hook-points.
//!
//! A plugin is told once when its machine is built, again before each
//! distinct lifecycle event a transition dispatches, and when a transition
//! commits its target state. Plugins observe; they cannot veto or suspend a
//! transition.

mod history;

pub use history::TransitionHistory;

use crate::effects::{StateMachine, TransitionContext};

pub trait Plugin<D, A>: Send + Sync {
    /// Called once, after observers are registered and before any transition.
    fn init(&self, _fsm: &StateMachine<D, A>) {}

    /// Called before each dispatched event name. Consecutive steps sharing
    /// an event name trigger this only once.
    fn lifecycle(&self, _context: &TransitionContext<D, A>, _args: &A) {}

    /// Called right after the machine moves to `context.to`, before the
    /// enter events are dispatched.
    fn commit(&self, _context: &TransitionContext<D, A>, _args: &A) {}
}
