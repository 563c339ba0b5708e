//! Lifecycle observers and their registry.

use crate::effects::context::TransitionContext;
use crate::effects::error::ObserverError;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Eventual result of an observer that suspends the pipeline.
///
/// Resolving with `Ok` resumes the transition, threading the value forward
/// as the latest result. Resolving with `Err` fails the transition.
pub type Deferred = BoxFuture<'static, Result<Option<Value>, ObserverError>>;

/// What an observer asks the pipeline to do next.
pub enum Response {
    /// Carry on; the latest result is cleared.
    Continue,
    /// Carry on, recording this value as the latest result.
    Value(Value),
    /// Veto the transition. Nothing after this observer runs.
    Cancel,
    /// Suspend until the deferred settles.
    Defer(Deferred),
}

impl Response {
    pub fn value(value: impl Into<Value>) -> Self {
        Response::Value(value.into())
    }

    pub fn defer<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<Value>, ObserverError>> + Send + 'static,
    {
        Response::Defer(future.boxed())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Continue => f.write_str("Continue"),
            Response::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Response::Cancel => f.write_str("Cancel"),
            Response::Defer(_) => f.write_str("Defer(..)"),
        }
    }
}

/// Result returned by observer hooks.
pub type HookResult = Result<Response, ObserverError>;

/// Something that reacts to lifecycle events.
///
/// `observes` is consulted once per event when a transition starts; only
/// observers answering `true` are notified for that event.
pub trait Observer<D, A>: Send + Sync {
    fn observes(&self, event: &str) -> bool;

    fn notify(&self, event: &str, context: &TransitionContext<D, A>, args: &A) -> HookResult;
}

type Handler<D, A> = Arc<dyn Fn(&TransitionContext<D, A>, &A) -> HookResult + Send + Sync>;

/// Observer built from a map of event name to handler.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::effects::{Handlers, Observer, Response};
///
/// let handlers: Handlers<(), ()> = Handlers::new()
///     .on("onBeforeWalk", |_ctx, _args| Ok(Response::Continue))
///     .on("onEnterWalking", |_ctx, _args| Ok(Response::value("arrived")));
///
/// assert!(handlers.observes("onBeforeWalk"));
/// assert!(!handlers.observes("onAfterWalk"));
/// ```
pub struct Handlers<D, A> {
    handlers: HashMap<String, Handler<D, A>>,
}

impl<D, A> Handlers<D, A> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Handle `event` with `handler`, replacing any earlier handler for it.
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&TransitionContext<D, A>, &A) -> HookResult + Send + Sync + 'static,
    {
        self.handlers.insert(event.into(), Arc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<D, A> Default for Handlers<D, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, A> Observer<D, A> for Handlers<D, A> {
    fn observes(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    fn notify(&self, event: &str, context: &TransitionContext<D, A>, args: &A) -> HookResult {
        match self.handlers.get(event) {
            Some(handler) => handler(context, args),
            None => Ok(Response::Continue),
        }
    }
}

/// Append-only, ordered list of observers.
///
/// Entry zero is the machine's own methods observer, registered at
/// construction. The same observer may be registered more than once and is
/// then notified once per registration.
pub struct ObserverRegistry<D, A> {
    observers: Vec<Arc<dyn Observer<D, A>>>,
}

impl<D, A> ObserverRegistry<D, A> {
    pub fn new(owner: Arc<dyn Observer<D, A>>) -> Self {
        Self {
            observers: vec![owner],
        }
    }

    pub fn register(&mut self, observer: Arc<dyn Observer<D, A>>) {
        self.observers.push(observer);
    }

    /// Observers of `event`, in registration order.
    pub fn implementing(&self, event: &str) -> Vec<Arc<dyn Observer<D, A>>> {
        self.observers
            .iter()
            .filter(|observer| observer.observes(event))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
