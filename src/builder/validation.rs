//! Configuration validation.
//!
//! Checks accumulate every violation instead of stopping at the first one,
//! so a broken configuration is reported in a single pass.

use crate::builder::machine::InitDef;
use crate::builder::transition::TransitionDef;
use crate::core::{Target, WILDCARD};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A problem found in a machine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("transition #{index} has an empty name")]
    EmptyTransitionName { index: usize },

    #[error("transition '{transition}' references an empty state name")]
    EmptyStateName { transition: String },

    #[error("init transition has an empty source or target")]
    EmptyInitTarget,

    #[error("init transition must target a concrete state, not the wildcard")]
    WildcardInitTarget,
}

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn check(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

fn transition_checks<D, A>(index: usize, def: &TransitionDef<D, A>) -> Vec<Check> {
    let mut checks = vec![check(!def.name.is_empty(), || {
        ConfigViolation::EmptyTransitionName { index }
    })];

    let empty_source = def.from.iter().any(String::is_empty);
    let empty_target = matches!(&def.to, Target::State(name) if name.is_empty());
    checks.push(check(!empty_source && !empty_target, || {
        ConfigViolation::EmptyStateName {
            transition: def.name.clone(),
        }
    }));
    checks
}

fn init_checks(init: &InitDef) -> Vec<Check> {
    vec![
        check(
            !init.name.is_empty() && !init.from.is_empty() && !init.to.is_empty(),
            || ConfigViolation::EmptyInitTarget,
        ),
        check(init.to != WILDCARD, || ConfigViolation::WildcardInitTarget),
    ]
}

/// Validate transitions and the optional init transition, accumulating
/// all violations.
pub fn validate<D, A>(
    transitions: &[TransitionDef<D, A>],
    init: Option<&InitDef>,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    for (index, def) in transitions.iter().enumerate() {
        checks.extend(transition_checks(index, def));
    }
    if let Some(init) = init {
        checks.extend(init_checks(init));
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Collapse a validation result into the list of violations, if any.
pub fn violations(result: Validation<(), NonEmptyVec<ConfigViolation>>) -> Vec<ConfigViolation> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
