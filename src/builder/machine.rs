//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::spec::{InitSpec, MachineSpec};
use crate::builder::transition::{TransitionBuilder, TransitionDef};
use crate::builder::validation::{validate, violations};
use crate::core::{Target, TransitionGraph};
use crate::effects::{
    DataInitializer, FaultHandler, FsmError, Handlers, InitTransition, Observer, ObserverRegistry,
    Outcome, Parts, StateMachine, TransitionFault,
};
use crate::plugin::Plugin;
use std::sync::Arc;

/// Name of the init transition when none is given.
pub const DEFAULT_INIT_NAME: &str = "init";
/// State a machine starts in before its init transition fires.
pub const DEFAULT_INITIAL_STATE: &str = "none";

/// Declared init transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitDef {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl InitDef {
    /// Init transition from the default initial state to `state`.
    pub fn to(state: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_INIT_NAME.to_string(),
            from: DEFAULT_INITIAL_STATE.to_string(),
            to: state.into(),
        }
    }
}

enum DataInit<D> {
    Value(D),
    Factory(Box<dyn FnOnce() -> D + Send>),
}

impl<D> DataInit<D> {
    fn into_data(self) -> D {
        match self {
            DataInit::Value(data) => data,
            DataInit::Factory(factory) => factory(),
        }
    }
}

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::builder::{StateMachineBuilder, TransitionBuilder};
/// use lifecycle_fsm::effects::{Handlers, Response};
///
/// let fsm = StateMachineBuilder::<(), ()>::new()
///     .transition(TransitionBuilder::new().name("walk").from("none").to("walking"))
///     .unwrap()
///     .methods(Handlers::<(), ()>::new().on("onBeforeWalk", |_, _| Ok(Response::Continue)))
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.state(), "none");
/// assert_eq!(fsm.all_states(), vec!["none", "walking"]);
/// ```
pub struct StateMachineBuilder<D, A = ()> {
    transitions: Vec<TransitionDef<D, A>>,
    init: Option<InitDef>,
    data: DataInit<D>,
    init_data: Option<DataInitializer<D, A>>,
    methods: Option<Arc<dyn Observer<D, A>>>,
    observers: Vec<Arc<dyn Observer<D, A>>>,
    plugins: Vec<Arc<dyn Plugin<D, A>>>,
    observe_unchanged_state: bool,
    on_invalid: Option<FaultHandler>,
    on_pending: Option<FaultHandler>,
}

impl<D, A> StateMachineBuilder<D, A>
where
    D: Default + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    /// Create a builder whose machine data starts as `D::default()`.
    pub fn new() -> Self {
        Self::with_data_factory(D::default)
    }
}

impl<D, A> Default for StateMachineBuilder<D, A>
where
    D: Default + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, A> StateMachineBuilder<D, A>
where
    D: Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    /// Create a builder with initial machine data.
    pub fn with_data(data: D) -> Self {
        Self::from_data(DataInit::Value(data))
    }

    /// Create a builder whose machine data is produced when the machine is
    /// built.
    pub fn with_data_factory<F>(factory: F) -> Self
    where
        F: FnOnce() -> D + Send + 'static,
    {
        Self::from_data(DataInit::Factory(Box::new(factory)))
    }

    fn from_data(data: DataInit<D>) -> Self {
        Self {
            transitions: Vec::new(),
            init: None,
            data,
            init_data: None,
            methods: None,
            observers: Vec::new(),
            plugins: Vec::new(),
            observe_unchanged_state: false,
            on_invalid: None,
            on_pending: None,
        }
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<D, A>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: TransitionDef<D, A>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionDef<D, A>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Start in `none` and move to `state` when [`StateMachine::init`] fires.
    pub fn init(mut self, state: impl Into<String>) -> Self {
        self.init = Some(InitDef::to(state));
        self
    }

    /// Use a fully specified init transition.
    pub fn init_transition(mut self, init: InitDef) -> Self {
        self.init = Some(init);
        self
    }

    /// The machine's own observer, always notified first.
    pub fn methods<O>(mut self, methods: O) -> Self
    where
        O: Observer<D, A> + 'static,
    {
        self.methods = Some(Arc::new(methods));
        self
    }

    /// Register an additional observer, notified after `methods` in
    /// registration order.
    /// Fold the arguments of the first [`StateMachine::init`] call into the
    /// machine data, before the init transition fires.
    pub fn init_data<F>(mut self, apply: F) -> Self
    where
        F: FnOnce(&mut D, &A) + Send + 'static,
    {
        self.init_data = Some(Box::new(apply));
        self
    }

    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: Observer<D, A> + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn plugin<P>(mut self, plugin: Arc<P>) -> Self
    where
        P: Plugin<D, A> + 'static,
    {
        self.plugins.push(plugin);
        self
    }

    /// Run the leave, commit and enter steps even for transitions that stay
    /// in the same state.
    pub fn observe_unchanged_state(mut self, observe: bool) -> Self {
        self.observe_unchanged_state = observe;
        self
    }

    /// Replace the default invalid-transition error with `handler`.
    pub fn on_invalid_transition<F>(mut self, handler: F) -> Self
    where
        F: Fn(&TransitionFault) -> Result<Outcome, FsmError> + Send + Sync + 'static,
    {
        self.on_invalid = Some(Arc::new(handler));
        self
    }

    /// Replace the default pending-transition error with `handler`.
    pub fn on_pending_transition<F>(mut self, handler: F) -> Self
    where
        F: Fn(&TransitionFault) -> Result<Outcome, FsmError> + Send + Sync + 'static,
    {
        self.on_pending = Some(Arc::new(handler));
        self
    }

    /// Apply a declarative spec: its transitions are appended, and its init
    /// transition and options replace the builder's.
    pub fn spec(mut self, spec: MachineSpec) -> Self {
        if let Some(init) = spec.init {
            self.init = Some(match init {
                InitSpec::State(state) => InitDef::to(state),
                InitSpec::Transition { name, from, to } => InitDef {
                    name: name.unwrap_or_else(|| DEFAULT_INIT_NAME.to_string()),
                    from: from.unwrap_or_else(|| DEFAULT_INITIAL_STATE.to_string()),
                    to,
                },
            });
        }
        self.observe_unchanged_state = spec.observe_unchanged_state;
        self.transitions
            .extend(spec.transitions.into_iter().map(|transition| {
                let from = transition.from.map(Vec::<String>::from).unwrap_or_default();
                let to = transition.to.map_or(Target::Wildcard, Target::literal);
                TransitionDef::new(transition.name, from, to)
            }));
        self
    }

    /// Build the state machine.
    ///
    /// Validates the configuration, registers every transition once per
    /// source state, installs the data and observers, and runs the plugin
    /// init hooks. The init transition is not fired; call
    /// [`StateMachine::init`] for that.
    pub fn build(self) -> Result<StateMachine<D, A>, BuildError> {
        let found = violations(validate(&self.transitions, self.init.as_ref()));
        if !found.is_empty() {
            return Err(BuildError::Invalid(found));
        }

        let mut graph = TransitionGraph::new();
        let init = match self.init {
            Some(init) => {
                graph.register_transition(&init.name, &init.from, Target::literal(init.to));
                InitTransition {
                    name: init.name,
                    from: init.from,
                    active: true,
                }
            }
            None => {
                graph.ensure_state(DEFAULT_INITIAL_STATE);
                InitTransition {
                    name: DEFAULT_INIT_NAME.to_string(),
                    from: DEFAULT_INITIAL_STATE.to_string(),
                    active: false,
                }
            }
        };

        for transition in &self.transitions {
            for from in transition.sources() {
                graph.register_transition(&transition.name, from, transition.to.clone());
            }
        }

        let methods = self
            .methods
            .unwrap_or_else(|| Arc::new(Handlers::<D, A>::new()));
        let mut registry = ObserverRegistry::new(methods);
        for observer in self.observers {
            registry.register(observer);
        }

        tracing::debug!(
            states = graph.states().len(),
            transitions = graph.transitions().len(),
            initial = %init.from,
            "state machine built"
        );

        Ok(StateMachine::from_parts(Parts {
            graph,
            registry,
            data: self.data.into_data(),
            init_data: self.init_data,
            plugins: self.plugins,
            init,
            observe_unchanged_state: self.observe_unchanged_state,
            on_invalid: self.on_invalid,
            on_pending: self.on_pending,
        }))
    }
}
