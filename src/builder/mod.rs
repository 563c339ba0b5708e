//! Builder API for ergonomic state machine construction.
//!
//! Machines are assembled from fluent builders, the [`transitions!`](crate::transitions)
//! macro or a JSON [`MachineSpec`]. Every path goes through the same
//! validation before the machine is built.

pub mod error;
pub mod machine;
pub mod macros;
pub mod spec;
pub mod transition;
pub mod validation;

pub use error::BuildError;
pub use machine::{InitDef, StateMachineBuilder, DEFAULT_INITIAL_STATE, DEFAULT_INIT_NAME};
pub use spec::{InitSpec, MachineSpec, Sources, TransitionSpec};
pub use transition::{TransitionBuilder, TransitionDef};
pub use validation::ConfigViolation;
