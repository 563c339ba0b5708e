//! Transition graph: the registry of states, transitions and their
//! lifecycle event names.
//!
//! The graph answers lookups only. Entries are keyed by source state and
//! transition name; a reserved wildcard bucket is consulted when no exact
//! source entry exists.

use super::naming::prepended;
use super::target::{Target, WILDCARD};
use std::collections::HashMap;

/// Generic event fired before every transition.
pub const ON_BEFORE_TRANSITION: &str = "onBeforeTransition";
/// Generic event fired after every transition.
pub const ON_AFTER_TRANSITION: &str = "onAfterTransition";
/// Generic event fired when entering any state.
pub const ON_ENTER_STATE: &str = "onEnterState";
/// Generic event fired when leaving any state.
pub const ON_LEAVE_STATE: &str = "onLeaveState";
/// Generic event fired during every transition.
pub const ON_TRANSITION: &str = "onTransition";

/// Event names derived from a state name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateEvents {
    /// `onEnter<State>`
    pub enter: String,
    /// `onLeave<State>`
    pub leave: String,
    /// `on<State>`
    pub on: String,
}

impl StateEvents {
    pub fn derive(state: &str) -> Self {
        Self {
            enter: prepended("onEnter", state),
            leave: prepended("onLeave", state),
            on: prepended("on", state),
        }
    }
}

/// Event names derived from a transition name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvents {
    /// `onBefore<Transition>`
    pub before: String,
    /// `onAfter<Transition>`
    pub after: String,
    /// `on<Transition>`
    pub on: String,
}

impl TransitionEvents {
    pub fn derive(transition: &str) -> Self {
        Self {
            before: prepended("onBefore", transition),
            after: prepended("onAfter", transition),
            on: prepended("on", transition),
        }
    }
}

/// A registered transition from one source state.
#[derive(Clone, Debug)]
pub struct Entry<D, A> {
    pub name: String,
    pub from: String,
    pub to: Target<D, A>,
}

/// Entries registered from one source state, keyed by transition name.
#[derive(Clone, Debug)]
struct Bucket<D, A> {
    entries: HashMap<String, Entry<D, A>>,
    order: Vec<String>,
}

impl<D, A> Bucket<D, A> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Replacing an entry keeps its original position.
    fn insert(&mut self, entry: Entry<D, A>) {
        if !self.entries.contains_key(&entry.name) {
            self.order.push(entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
    }

    fn get(&self, name: &str) -> Option<&Entry<D, A>> {
        self.entries.get(name)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Registry of states and transitions.
///
/// Registration is idempotent for names: registering a known state or
/// transition name again does not duplicate bookkeeping. Re-registering the
/// same `(from, name)` pair replaces the earlier entry.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::{Target, TransitionGraph};
///
/// let mut graph: TransitionGraph<(), ()> = TransitionGraph::new();
/// graph.register_transition("walk", "idle", Target::literal("walking"));
/// graph.register_transition("panic", "*", Target::literal("panicking"));
///
/// assert!(graph.lookup("idle", "walk").is_some());
/// assert!(graph.lookup("walking", "panic").is_some());
/// assert!(graph.lookup("walking", "walk").is_none());
/// assert_eq!(graph.transitions_from("idle"), vec!["walk", "panic"]);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionGraph<D, A> {
    states: Vec<String>,
    transitions: Vec<String>,
    state_events: HashMap<String, StateEvents>,
    transition_events: HashMap<String, TransitionEvents>,
    buckets: HashMap<String, Bucket<D, A>>,
}

impl<D, A> Default for TransitionGraph<D, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, A> TransitionGraph<D, A> {
    /// Create an empty graph holding only the wildcard bucket.
    pub fn new() -> Self {
        let mut buckets = HashMap::new();
        buckets.insert(WILDCARD.to_string(), Bucket::new());
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            state_events: HashMap::new(),
            transition_events: HashMap::new(),
            buckets,
        }
    }

    /// Register `name` from `from`, leading to `to`.
    ///
    /// The source and any literal target are registered as states. Resolver
    /// targets are registered later, when they resolve to an unseen state.
    pub fn register_transition(&mut self, name: &str, from: &str, to: Target<D, A>) {
        self.ensure_state(from);
        if let Some(state) = to.state() {
            let state = state.to_string();
            self.ensure_state(&state);
        }
        self.ensure_transition(name);

        let entry = Entry {
            name: name.to_string(),
            from: from.to_string(),
            to,
        };
        self.buckets
            .entry(from.to_string())
            .or_insert_with(Bucket::new)
            .insert(entry);
    }

    /// Find the entry for `name` from `state`, falling back to the wildcard
    /// bucket when no exact entry exists.
    pub fn lookup(&self, state: &str, name: &str) -> Option<&Entry<D, A>> {
        self.find(state, name).or_else(|| self.find(WILDCARD, name))
    }

    fn find(&self, state: &str, name: &str) -> Option<&Entry<D, A>> {
        self.buckets
            .get(state)
            .and_then(|bucket| bucket.get(name))
    }

    /// Transition names available from `state`: exact entries first, then
    /// wildcard entries not already listed.
    pub fn transitions_from(&self, state: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let exact = if state == WILDCARD {
            None
        } else {
            self.buckets.get(state)
        };
        for name in exact
            .into_iter()
            .chain(self.buckets.get(WILDCARD))
            .flat_map(|bucket| bucket.names())
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Register a state discovered at runtime. Returns `true` when the state
    /// was not known before.
    pub fn ensure_state(&mut self, state: &str) -> bool {
        if self.buckets.contains_key(state) {
            return false;
        }
        self.states.push(state.to_string());
        self.state_events
            .insert(state.to_string(), StateEvents::derive(state));
        self.buckets.insert(state.to_string(), Bucket::new());
        true
    }

    fn ensure_transition(&mut self, name: &str) {
        if !self.transition_events.contains_key(name) {
            self.transitions.push(name.to_string());
            self.transition_events
                .insert(name.to_string(), TransitionEvents::derive(name));
        }
    }

    /// Whether `state` has been registered.
    pub fn has_state(&self, state: &str) -> bool {
        state != WILDCARD && self.buckets.contains_key(state)
    }

    /// All known states in registration order. The wildcard is never listed.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// All known transition names in registration order.
    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }

    /// Cached event names for `state`, derived on the fly for unknown states.
    pub fn state_events(&self, state: &str) -> StateEvents {
        self.state_events
            .get(state)
            .cloned()
            .unwrap_or_else(|| StateEvents::derive(state))
    }

    /// Cached event names for `transition`, derived on the fly when unknown.
    pub fn transition_events(&self, transition: &str) -> TransitionEvents {
        self.transition_events
            .get(transition)
            .cloned()
            .unwrap_or_else(|| TransitionEvents::derive(transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Resolver;

    fn graph() -> TransitionGraph<(), ()> {
        TransitionGraph::new()
    }

    #[test]
    fn registration_records_states_and_transitions() {
        let mut graph = graph();
        graph.register_transition("walk", "idle", Target::literal("walking"));
        graph.register_transition("stop", "walking", Target::literal("idle"));

        assert_eq!(graph.states(), ["idle", "walking"]);
        assert_eq!(graph.transitions(), ["walk", "stop"]);
    }

    #[test]
    fn wildcard_is_never_a_state() {
        let mut graph = graph();
        graph.register_transition("panic", WILDCARD, Target::literal("panicking"));
        graph.register_transition("noop", "idle", Target::Wildcard);

        assert_eq!(graph.states(), ["panicking", "idle"]);
        assert!(!graph.has_state(WILDCARD));
        assert!(!graph.ensure_state(WILDCARD));
    }

    #[test]
    fn resolver_targets_are_not_registered_eagerly() {
        let mut graph = graph();
        graph.register_transition(
            "jump",
            "idle",
            Target::Resolver(Resolver::new(|_, _| Some("air".to_string()))),
        );

        assert_eq!(graph.states(), ["idle"]);
        assert!(graph.ensure_state("air"));
        assert!(!graph.ensure_state("air"));
        assert_eq!(graph.states(), ["idle", "air"]);
    }

    #[test]
    fn exact_entry_shadows_wildcard() {
        let mut graph = graph();
        graph.register_transition("reset", WILDCARD, Target::literal("idle"));
        graph.register_transition("reset", "broken", Target::literal("repair"));

        let entry = graph.lookup("broken", "reset").unwrap();
        assert_eq!(entry.from, "broken");
        assert_eq!(entry.to.state(), Some("repair"));

        let entry = graph.lookup("walking", "reset").unwrap();
        assert_eq!(entry.from, WILDCARD);
        assert_eq!(entry.to.state(), Some("idle"));
    }

    #[test]
    fn unknown_lookups_return_none() {
        let graph = graph();
        assert!(graph.lookup("nowhere", "nothing").is_none());
        assert!(graph.transitions_from("nowhere").is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let mut graph = graph();
        graph.register_transition("walk", "idle", Target::literal("walking"));
        graph.register_transition("walk", "idle", Target::literal("running"));

        assert_eq!(
            graph.lookup("idle", "walk").unwrap().to.state(),
            Some("running")
        );
        assert_eq!(graph.transitions(), ["walk"]);
        assert_eq!(graph.transitions_from("idle"), vec!["walk"]);
    }

    #[test]
    fn replacing_an_entry_keeps_its_position() {
        let mut graph = graph();
        graph.register_transition("walk", "idle", Target::literal("walking"));
        graph.register_transition("run", "idle", Target::literal("running"));
        graph.register_transition("walk", "idle", Target::literal("strolling"));

        assert_eq!(graph.transitions_from("idle"), vec!["walk", "run"]);
        assert_eq!(
            graph.lookup("idle", "walk").unwrap().to.state(),
            Some("strolling")
        );
        assert_eq!(graph.lookup("idle", "run").unwrap().from, "idle");
    }

    #[test]
    fn available_transitions_union_exact_and_wildcard() {
        let mut graph = graph();
        graph.register_transition("walk", "idle", Target::literal("walking"));
        graph.register_transition("reset", "idle", Target::literal("idle"));
        graph.register_transition("reset", WILDCARD, Target::literal("idle"));
        graph.register_transition("panic", WILDCARD, Target::literal("panicking"));

        assert_eq!(graph.transitions_from("idle"), vec!["walk", "reset", "panic"]);
        assert_eq!(graph.transitions_from("walking"), vec!["reset", "panic"]);
    }

    #[test]
    fn event_names_are_cached_per_name() {
        let mut graph = graph();
        graph.register_transition("warm-up", "cold", Target::literal("warm"));

        assert_eq!(
            graph.transition_events("warm-up"),
            TransitionEvents {
                before: "onBeforeWarmUp".to_string(),
                after: "onAfterWarmUp".to_string(),
                on: "onWarmUp".to_string(),
            }
        );
        assert_eq!(graph.state_events("cold").enter, "onEnterCold");
        assert_eq!(graph.state_events("cold").leave, "onLeaveCold");
        assert_eq!(graph.state_events("warm").on, "onWarm");
    }

    #[test]
    fn unknown_names_still_derive_events() {
        let graph = graph();
        assert_eq!(graph.state_events("ghost").enter, "onEnterGhost");
        assert_eq!(graph.transition_events("haunt").before, "onBeforeHaunt");
    }
}
