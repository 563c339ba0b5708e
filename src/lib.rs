//! Lifecycle FSM: a finite state machine with observable transitions
//!
//! The crate follows a "pure core, imperative shell" split. The transition
//! graph and its lookups are plain data with no side effects, while running
//! a transition (notifying observers, committing the new state, suspending
//! on deferred work) lives in the effects layer.
//!
//! # Core Concepts
//!
//! - **Transition graph**: named transitions from a source state, or from any
//!   state via the `*` wildcard, to a literal state, the same state, or a
//!   state picked at fire time by a resolver
//! - **Observers**: react to lifecycle events around each transition and may
//!   veto it, fail it, or defer it until a future settles
//! - **Plugins**: see the machine once when it is built, then each dispatched
//!   lifecycle event and each committed state change
//!
//! # Example
//!
//! ```rust
//! use futures::FutureExt;
//! use lifecycle_fsm::builder::{StateMachineBuilder, TransitionBuilder};
//! use lifecycle_fsm::effects::{Handlers, Outcome, Response};
//!
//! let fsm = StateMachineBuilder::<(), ()>::new()
//!     .init("solid")
//!     .transition(TransitionBuilder::new().name("melt").from("solid").to("liquid"))
//!     .unwrap()
//!     .transition(TransitionBuilder::new().name("freeze").from("liquid").to("solid"))
//!     .unwrap()
//!     .methods(
//!         Handlers::<(), ()>::new()
//!             .on("onBeforeFreeze", |_, _| Ok(Response::Cancel))
//!             .on("onMelt", |_, _| Ok(Response::value("dripping"))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! fsm.init(()).now_or_never().unwrap().unwrap();
//!
//! let melted = fsm.fire("melt", ()).now_or_never().unwrap().unwrap();
//! assert_eq!(melted, Outcome::Returned("dripping".into()));
//! assert!(fsm.is("liquid"));
//!
//! let frozen = fsm.fire("freeze", ()).now_or_never().unwrap().unwrap();
//! assert!(frozen.is_cancelled());
//! assert!(fsm.is("liquid"));
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod plugin;

// Re-export commonly used types
pub use builder::{BuildError, MachineSpec, StateMachineBuilder, TransitionBuilder};
pub use crate::core::{StateHistory, StateTransition, Target, WILDCARD};
pub use effects::{FsmError, Handlers, Observer, ObserverError, Outcome, Response, StateMachine};
pub use plugin::{Plugin, TransitionHistory};
