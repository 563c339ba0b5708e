//! Transition targets.
//!
//! A transition's destination is either a literal state, the wildcard
//! sentinel (stay in the current state), or a resolver invoked lazily at
//! lookup time to pick the destination dynamically.

use std::fmt;
use std::sync::Arc;

/// Reserved name for the wildcard source bucket and the "stay" target.
pub const WILDCARD: &str = "*";

/// Lazily evaluated transition target.
///
/// A resolver receives the machine's data and the call arguments. It
/// returns the destination state name, [`WILDCARD`] to stay put, or `None`
/// when no transition is allowed. An empty name counts as `None`.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::Resolver;
///
/// struct Door { locked: bool }
///
/// let open = Resolver::new(|door: &Door, _args: &()| {
///     (!door.locked).then(|| "open".to_string())
/// });
///
/// assert_eq!(open.resolve(&Door { locked: false }, &()), Some("open".to_string()));
/// assert_eq!(open.resolve(&Door { locked: true }, &()), None);
/// ```
pub struct Resolver<D, A> {
    resolve: Arc<dyn Fn(&D, &A) -> Option<String> + Send + Sync>,
}

impl<D, A> Resolver<D, A> {
    /// Create a resolver from a function of the data and call arguments.
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&D, &A) -> Option<String> + Send + Sync + 'static,
    {
        Resolver {
            resolve: Arc::new(resolve),
        }
    }

    /// Evaluate the resolver. Empty names are normalized to `None`.
    pub fn resolve(&self, data: &D, args: &A) -> Option<String> {
        (self.resolve)(data, args).filter(|name| !name.is_empty())
    }
}

impl<D, A> Clone for Resolver<D, A> {
    fn clone(&self) -> Self {
        Self {
            resolve: Arc::clone(&self.resolve),
        }
    }
}

impl<D, A> fmt::Debug for Resolver<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// Where a transition leads.
pub enum Target<D, A> {
    /// A fixed destination state.
    State(String),
    /// Remain in the current state.
    Wildcard,
    /// Destination computed at lookup time.
    Resolver(Resolver<D, A>),
}

impl<D, A> Target<D, A> {
    /// Parse a literal target, mapping the sentinel to [`Target::Wildcard`].
    pub fn literal(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == WILDCARD {
            Target::Wildcard
        } else {
            Target::State(name)
        }
    }

    /// The literal state name, if this target names one.
    pub fn state(&self) -> Option<&str> {
        match self {
            Target::State(name) => Some(name),
            _ => None,
        }
    }
}

impl<D, A> Clone for Target<D, A> {
    fn clone(&self) -> Self {
        match self {
            Target::State(name) => Target::State(name.clone()),
            Target::Wildcard => Target::Wildcard,
            Target::Resolver(resolver) => Target::Resolver(resolver.clone()),
        }
    }
}

impl<D, A> fmt::Debug for Target<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::State(name) => f.debug_tuple("State").field(name).finish(),
            Target::Wildcard => f.write_str("Wildcard"),
            Target::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}
