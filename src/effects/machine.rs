//! State machine that resolves and executes transitions.

use crate::core::{Target, TransitionGraph, WILDCARD};
use crate::effects::context::TransitionContext;
use crate::effects::error::{FsmError, TransitionFault};
use crate::effects::observer::{Handlers, HookResult, Observer, ObserverRegistry};
use crate::effects::pipeline::EventPipeline;
use crate::plugin::Plugin;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// How a transition that ran its pipeline ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Every step ran and the last observer returned nothing.
    Completed,
    /// Every step ran; carries the last observer's value.
    Returned(Value),
    /// An observer vetoed. The state may already have changed if the veto
    /// came after the commit step.
    Cancelled,
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Returned(value) => Some(value),
            _ => None,
        }
    }
}

/// Result of firing a transition.
///
/// A `Transit` is a future. When no observer deferred, it is already
/// complete and `now_or_never` yields the result immediately; otherwise it
/// must be awaited for the transition to continue. Dropping a suspended
/// `Transit` abandons the remaining steps: the machine keeps any state
/// already committed and is no longer pending.
#[must_use = "a suspended transition only makes progress when awaited"]
pub struct Transit {
    inner: TransitInner,
}

enum TransitInner {
    Ready(future::Ready<Result<Outcome, FsmError>>),
    Suspended(BoxFuture<'static, Result<Outcome, FsmError>>),
}

impl Transit {
    pub(crate) fn ready(result: Result<Outcome, FsmError>) -> Self {
        Self {
            inner: TransitInner::Ready(future::ready(result)),
        }
    }

    pub(crate) fn suspended<F>(future: F) -> Self
    where
        F: Future<Output = Result<Outcome, FsmError>> + Send + 'static,
    {
        Self {
            inner: TransitInner::Suspended(future.boxed()),
        }
    }

    /// Whether an observer deferred and the transition is still in flight.
    pub fn is_suspended(&self) -> bool {
        matches!(self.inner, TransitInner::Suspended(_))
    }
}

impl Future for Transit {
    type Output = Result<Outcome, FsmError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.inner {
            TransitInner::Ready(ready) => Pin::new(ready).poll(cx),
            TransitInner::Suspended(future) => future.as_mut().poll(cx),
        }
    }
}

impl fmt::Debug for Transit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transit")
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

/// Handler for the invalid and pending transition paths.
pub type FaultHandler = Arc<dyn Fn(&TransitionFault) -> Result<Outcome, FsmError> + Send + Sync>;

/// Folds the arguments of the first init call into the machine data.
pub type DataInitializer<D, A> = Box<dyn FnOnce(&mut D, &A) + Send>;

/// The transition fired by [`StateMachine::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitTransition {
    pub name: String,
    pub from: String,
    /// `false` when no init transition was configured; the machine then
    /// starts settled in `from`.
    pub active: bool,
}

struct EngineStatus {
    state: String,
    pending: bool,
}

pub(crate) struct Parts<D, A> {
    pub graph: TransitionGraph<D, A>,
    pub registry: ObserverRegistry<D, A>,
    pub data: D,
    pub init_data: Option<DataInitializer<D, A>>,
    pub plugins: Vec<Arc<dyn Plugin<D, A>>>,
    pub init: InitTransition,
    pub observe_unchanged_state: bool,
    pub on_invalid: Option<FaultHandler>,
    pub on_pending: Option<FaultHandler>,
}

struct Shared<D, A> {
    graph: RwLock<TransitionGraph<D, A>>,
    observers: RwLock<ObserverRegistry<D, A>>,
    status: Mutex<EngineStatus>,
    data: RwLock<D>,
    init_data: Mutex<Option<DataInitializer<D, A>>>,
    plugins: Vec<Arc<dyn Plugin<D, A>>>,
    init: InitTransition,
    observe_unchanged_state: bool,
    on_invalid: Option<FaultHandler>,
    on_pending: Option<FaultHandler>,
}

/// Finite state machine over named states and transitions.
///
/// The machine is a cheap, cloneable handle. Observers receive a handle in
/// their [`TransitionContext`] and may query it mid-transition; firing
/// while a transition is pending takes the pending-conflict path.
///
/// # Example
///
/// ```rust
/// use futures::FutureExt;
/// use lifecycle_fsm::builder::{StateMachineBuilder, TransitionBuilder};
/// use lifecycle_fsm::effects::Outcome;
///
/// let fsm = StateMachineBuilder::<(), ()>::new()
///     .init("idle")
///     .transition(TransitionBuilder::new().name("walk").from("idle").to("walking"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// fsm.init(()).now_or_never().unwrap().unwrap();
/// assert!(fsm.is("idle"));
/// assert!(fsm.can("walk"));
///
/// let outcome = fsm.fire("walk", ()).now_or_never().unwrap().unwrap();
/// assert_eq!(outcome, Outcome::Completed);
/// assert_eq!(fsm.state(), "walking");
/// ```
pub struct StateMachine<D, A = ()> {
    shared: Arc<Shared<D, A>>,
}

impl<D, A> Clone for StateMachine<D, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D, A> fmt::Debug for StateMachine<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.shared.status.lock();
        f.debug_struct("StateMachine")
            .field("state", &status.state)
            .field("pending", &status.pending)
            .finish_non_exhaustive()
    }
}

impl<D, A> StateMachine<D, A> {
    /// Current state.
    pub fn state(&self) -> String {
        self.shared.status.lock().state.clone()
    }

    /// Whether the machine is in `state`.
    pub fn is(&self, state: &str) -> bool {
        self.shared.status.lock().state == state
    }

    /// Whether the machine is in any of `states`.
    pub fn is_any<S: AsRef<str>>(&self, states: &[S]) -> bool {
        let status = self.shared.status.lock();
        states.iter().any(|state| state.as_ref() == status.state)
    }

    /// Whether a transition is in flight.
    pub fn is_pending(&self) -> bool {
        self.shared.status.lock().pending
    }

    /// Whether `transition` could fire now with `args`.
    pub fn can_with(&self, transition: &str, args: &A) -> bool {
        !self.is_pending() && self.seek(transition, args).is_some()
    }

    /// Whether `transition` could fire now with default arguments.
    pub fn can(&self, transition: &str) -> bool
    where
        A: Default,
    {
        self.can_with(transition, &A::default())
    }

    pub fn cannot(&self, transition: &str) -> bool
    where
        A: Default,
    {
        !self.can(transition)
    }

    /// Resolve where `transition` would lead from the current state.
    ///
    /// Does not mutate the machine. Resolvers are invoked with the machine's
    /// data and `args`; a resolver answering the wildcard stays put.
    pub fn seek(&self, transition: &str, args: &A) -> Option<String> {
        let state = self.state();
        let target = {
            let graph = self.shared.graph.read();
            graph.lookup(&state, transition)?.to.clone()
        };
        match target {
            Target::State(name) => Some(name),
            Target::Wildcard => Some(state),
            Target::Resolver(resolver) => {
                let resolved = resolver.resolve(&*self.shared.data.read(), args)?;
                if resolved == WILDCARD {
                    Some(state)
                } else {
                    Some(resolved)
                }
            }
        }
    }

    /// Transitions available from the current state.
    pub fn transitions(&self) -> Vec<String> {
        let state = self.state();
        self.shared
            .graph
            .read()
            .transitions_from(&state)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Every known transition name, in registration order.
    pub fn all_transitions(&self) -> Vec<String> {
        self.shared.graph.read().transitions().to_vec()
    }

    /// Every known state, in registration order, including states first
    /// seen through resolvers.
    pub fn all_states(&self) -> Vec<String> {
        self.shared.graph.read().states().to_vec()
    }

    /// Read the machine's data.
    pub fn with_data<R>(&self, read: impl FnOnce(&D) -> R) -> R {
        read(&*self.shared.data.read())
    }

    /// Update the machine's data.
    ///
    /// Must not be called from inside a resolver.
    pub fn with_data_mut<R>(&self, update: impl FnOnce(&mut D) -> R) -> R {
        update(&mut *self.shared.data.write())
    }

    pub(crate) fn graph(&self) -> RwLockReadGuard<'_, TransitionGraph<D, A>> {
        self.shared.graph.read()
    }

    pub(crate) fn observers(&self) -> RwLockReadGuard<'_, ObserverRegistry<D, A>> {
        self.shared.observers.read()
    }

    pub(crate) fn plugins(&self) -> &[Arc<dyn Plugin<D, A>>] {
        &self.shared.plugins
    }

    pub(crate) fn commit(&self, context: &TransitionContext<D, A>) {
        self.shared.status.lock().state = context.to.clone();
        tracing::debug!(
            transition = %context.transition,
            from = %context.from,
            to = %context.to,
            "state committed"
        );
    }

    pub(crate) fn end_transit(&self) {
        self.shared.status.lock().pending = false;
    }

    fn invalid_transition(&self, fault: &TransitionFault) -> Result<Outcome, FsmError> {
        match &self.shared.on_invalid {
            Some(handler) => handler(fault),
            None => {
                tracing::warn!(
                    transition = %fault.transition,
                    state = %fault.state,
                    "transition is invalid in current state"
                );
                Err(fault.invalid())
            }
        }
    }

    fn pending_transition(&self, fault: &TransitionFault) -> Result<Outcome, FsmError> {
        match &self.shared.on_pending {
            Some(handler) => handler(fault),
            None => {
                tracing::warn!(
                    transition = %fault.transition,
                    state = %fault.state,
                    "transition rejected while another is in progress"
                );
                Err(fault.pending())
            }
        }
    }
}

impl<D, A> StateMachine<D, A>
where
    D: Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    pub(crate) fn from_parts(parts: Parts<D, A>) -> Self {
        let state = parts.init.from.clone();
        let machine = Self {
            shared: Arc::new(Shared {
                graph: RwLock::new(parts.graph),
                observers: RwLock::new(parts.registry),
                status: Mutex::new(EngineStatus {
                    state,
                    pending: false,
                }),
                data: RwLock::new(parts.data),
                init_data: Mutex::new(parts.init_data),
                plugins: parts.plugins,
                init: parts.init,
                observe_unchanged_state: parts.observe_unchanged_state,
                on_invalid: parts.on_invalid,
                on_pending: parts.on_pending,
            }),
        };
        for plugin in machine.plugins() {
            plugin.init(&machine);
        }
        machine
    }

    /// Fire the configured init transition, if any.
    ///
    /// The first call hands `args` to the builder's data initializer before
    /// anything fires. Without an init transition the machine is already
    /// settled and this completes immediately.
    pub fn init(&self, args: A) -> Transit {
        let apply = self.shared.init_data.lock().take();
        if let Some(apply) = apply {
            apply(&mut *self.shared.data.write(), &args);
        }
        let init = &self.shared.init;
        if init.active {
            self.fire(&init.name, args)
        } else {
            Transit::ready(Ok(Outcome::Completed))
        }
    }

    /// Fire `transition` from the current state.
    pub fn fire(&self, transition: &str, args: A) -> Transit {
        let from = self.state();
        let to = self.seek(transition, &args);
        self.transit(transition, &from, to, args)
    }

    /// Run `transition` from `from` to an already resolved `to`.
    ///
    /// A missing target takes the invalid-transition path and a transition
    /// already in flight takes the pending-conflict path; neither touches
    /// the machine's state.
    pub fn transit(&self, transition: &str, from: &str, to: Option<String>, args: A) -> Transit {
        let Some(to) = to.filter(|to| !to.is_empty()) else {
            let fault = TransitionFault {
                transition: transition.to_string(),
                from: from.to_string(),
                to: None,
                state: self.state(),
            };
            return Transit::ready(self.invalid_transition(&fault));
        };

        {
            let mut status = self.shared.status.lock();
            if status.pending {
                let fault = TransitionFault {
                    transition: transition.to_string(),
                    from: from.to_string(),
                    to: Some(to),
                    state: status.state.clone(),
                };
                drop(status);
                return Transit::ready(self.pending_transition(&fault));
            }
            if self.shared.graph.write().ensure_state(&to) {
                tracing::trace!(state = %to, "registered state discovered at runtime");
            }
            status.pending = true;
        }

        let changed = self.shared.observe_unchanged_state || from != to;
        let context = TransitionContext::new(self.clone(), transition, from, &to);
        EventPipeline::new(context, args, changed).run()
    }

    /// Register an observer after the machine has been built.
    pub fn observe<O>(&self, observer: O)
    where
        O: Observer<D, A> + 'static,
    {
        self.observe_shared(Arc::new(observer));
    }

    /// Register a shared observer. Registering the same observer twice
    /// notifies it twice.
    pub fn observe_shared(&self, observer: Arc<dyn Observer<D, A>>) {
        self.shared.observers.write().register(observer);
    }

    /// Register a single handler for one event name.
    pub fn observe_event<F>(&self, event: impl Into<String>, handler: F)
    where
        F: Fn(&TransitionContext<D, A>, &A) -> HookResult + Send + Sync + 'static,
    {
        self.observe(Handlers::new().on(event, handler));
    }
}
