//! Transition execution: the imperative shell around the pure graph.
//!
//! # Key Concepts
//!
//! - **State machine**: resolves a transition's target and guards against
//!   overlapping transitions
//! - **Pipeline**: runs the ordered lifecycle events around the commit step
//! - **Observers**: react to events; they may veto, fail, or defer
//!
//! # Event order
//!
//! For a transition `t` from `a` to `b`:
//!
//! 1. `onBeforeTransition`, `onBefore<T>`
//! 2. `onLeaveState`, `onLeave<A>` (state-changing only)
//! 3. `onTransition`
//! 4. commit: the state becomes `b` (state-changing only)
//! 5. `onEnterState`, `onEnter<B>`, `on<B>` (state-changing only)
//! 6. `onAfterTransition`, `onAfter<T>`, `on<T>`
//!
//! A veto after the commit step does not revert the state.

mod context;
mod error;
mod machine;
mod observer;
mod pipeline;

pub use context::TransitionContext;
pub use error::{FsmError, ObserverError, TransitionFault};
pub use machine::{
    DataInitializer, FaultHandler, InitTransition, Outcome, StateMachine, Transit,
};
pub use observer::{Deferred, Handlers, HookResult, Observer, ObserverRegistry, Response};

pub(crate) use machine::Parts;
