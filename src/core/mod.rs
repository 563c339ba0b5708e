//! Pure transition-graph types.
//!
//! This module holds everything that can be answered without running a
//! transition:
//! - Event name derivation for states and transitions
//! - Transition targets (literal, wildcard, resolver)
//! - The transition graph and its lookups
//! - Immutable history of committed transitions

mod graph;
mod history;
pub mod naming;
mod target;

pub use graph::{
    Entry, StateEvents, TransitionEvents, TransitionGraph, ON_AFTER_TRANSITION,
    ON_BEFORE_TRANSITION, ON_ENTER_STATE, ON_LEAVE_STATE, ON_TRANSITION,
};
pub use history::{StateHistory, StateTransition};
pub use target::{Resolver, Target, WILDCARD};
