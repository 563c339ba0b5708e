//! Builder for declaring transitions.

use crate::builder::error::BuildError;
use crate::core::{Resolver, Target, WILDCARD};

/// A declared transition: a name, its source states and a target.
///
/// An empty source list means the transition fires from any state. Each
/// source is registered as its own graph entry.
pub struct TransitionDef<D, A> {
    pub name: String,
    pub from: Vec<String>,
    pub to: Target<D, A>,
}

impl<D, A> TransitionDef<D, A> {
    pub fn new(name: impl Into<String>, from: Vec<String>, to: Target<D, A>) -> Self {
        Self {
            name: name.into(),
            from,
            to,
        }
    }

    /// Source states with the wildcard standing in for an empty list.
    pub fn sources(&self) -> Vec<&str> {
        if self.from.is_empty() {
            vec![WILDCARD]
        } else {
            self.from.iter().map(String::as_str).collect()
        }
    }
}

impl<D, A> Clone for TransitionDef<D, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

impl<D, A> std::fmt::Debug for TransitionDef<D, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionDef")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Builder for constructing transitions with a fluent API.
///
/// Omitting `from` allows the transition from any state; omitting `to`
/// keeps the machine in its current state.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::builder::TransitionBuilder;
///
/// let warm_up = TransitionBuilder::<(), ()>::new()
///     .name("warm-up")
///     .from("cold")
///     .from("frozen")
///     .to("warm")
///     .build()
///     .unwrap();
///
/// assert_eq!(warm_up.sources(), vec!["cold", "frozen"]);
/// ```
pub struct TransitionBuilder<D, A> {
    name: Option<String>,
    from: Vec<String>,
    to: Target<D, A>,
}

impl<D, A> TransitionBuilder<D, A> {
    pub fn new() -> Self {
        Self {
            name: None,
            from: Vec::new(),
            to: Target::Wildcard,
        }
    }

    /// Set the transition name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a source state. May be called repeatedly.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from.push(state.into());
        self
    }

    /// Add several source states.
    pub fn from_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from.extend(states.into_iter().map(Into::into));
        self
    }

    /// Allow the transition from any state.
    pub fn from_any(mut self) -> Self {
        self.from = vec![WILDCARD.to_string()];
        self
    }

    /// Set a literal target state. `"*"` keeps the current state.
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Target::literal(state);
        self
    }

    /// Keep the current state.
    pub fn to_same(mut self) -> Self {
        self.to = Target::Wildcard;
        self
    }

    /// Pick the target at fire time.
    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&D, &A) -> Option<String> + Send + Sync + 'static,
    {
        self.to = Target::Resolver(Resolver::new(resolver));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<TransitionDef<D, A>, BuildError> {
        let name = self.name.ok_or(BuildError::MissingTransitionName)?;
        Ok(TransitionDef {
            name,
            from: self.from,
            to: self.to,
        })
    }
}

impl<D, A> Default for TransitionBuilder<D, A> {
    fn default() -> Self {
        Self::new()
    }
}
