//! Property-based tests for the transition graph and engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use futures::FutureExt;
use lifecycle_fsm::builder::{StateMachineBuilder, TransitionBuilder};
use lifecycle_fsm::core::naming::{camelize, prepended};
use lifecycle_fsm::core::{StateHistory, StateTransition, Target, TransitionGraph};
use lifecycle_fsm::effects::{HookResult, Observer, Response, TransitionContext};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

const STATES: [&str; 4] = ["idle", "walking", "running", "resting"];
const TRANSITIONS: [&str; 3] = ["walk", "run", "rest"];

prop_compose! {
    fn arbitrary_state()(index in 0..STATES.len()) -> &'static str {
        STATES[index]
    }
}

prop_compose! {
    fn arbitrary_transition()(index in 0..TRANSITIONS.len()) -> &'static str {
        TRANSITIONS[index]
    }
}

fn label() -> impl Strategy<Value = String> {
    "[a-z]{1,6}([_-][a-z]{1,6}){0,3}"
}

/// Records every lifecycle event it sees.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Observer<(), ()> for Recorder {
    fn observes(&self, _event: &str) -> bool {
        true
    }

    fn notify(&self, event: &str, _: &TransitionContext<(), ()>, _: &()) -> HookResult {
        self.events.lock().push(event.to_string());
        Ok(Response::Continue)
    }
}

proptest! {
    #[test]
    fn exact_entry_shadows_wildcard(
        state in arbitrary_state(),
        other in arbitrary_state(),
        transition in arbitrary_transition(),
    ) {
        let mut graph: TransitionGraph<(), ()> = TransitionGraph::new();
        graph.register_transition(transition, "*", Target::literal("anywhere"));
        graph.register_transition(transition, state, Target::literal("exact"));

        let exact = graph.lookup(state, transition).unwrap();
        prop_assert_eq!(exact.to.state(), Some("exact"));

        if other != state {
            let fallback = graph.lookup(other, transition).unwrap();
            prop_assert_eq!(fallback.to.state(), Some("anywhere"));
        }
    }

    #[test]
    fn registration_is_idempotent(
        entries in prop::collection::vec(
            (arbitrary_transition(), arbitrary_state(), arbitrary_state()),
            1..20,
        ),
        repeats in 1..4usize,
    ) {
        let mut once: TransitionGraph<(), ()> = TransitionGraph::new();
        for (name, from, to) in &entries {
            once.register_transition(name, from, Target::literal(*to));
        }

        let mut many: TransitionGraph<(), ()> = TransitionGraph::new();
        for _ in 0..repeats {
            for (name, from, to) in &entries {
                many.register_transition(name, from, Target::literal(*to));
            }
        }

        prop_assert_eq!(once.states(), many.states());
        prop_assert_eq!(once.transitions(), many.transitions());
        for state in STATES {
            prop_assert_eq!(once.transitions_from(state), many.transitions_from(state));
        }
    }

    #[test]
    fn lookup_never_matches_unregistered_names(
        state in arbitrary_state(),
        transition in arbitrary_transition(),
    ) {
        let mut graph: TransitionGraph<(), ()> = TransitionGraph::new();
        graph.register_transition(transition, state, Target::literal("done"));
        prop_assert!(graph.lookup(state, "fly").is_none());
    }

    #[test]
    fn unchanged_state_skips_leave_and_enter(observe in any::<bool>()) {
        let recorder = Arc::new(Recorder::default());
        let fsm = StateMachineBuilder::<(), ()>::new()
            .init("idle")
            .transition(TransitionBuilder::new().name("stay").from("idle").to("idle"))
            .unwrap()
            .observe_unchanged_state(observe)
            .build()
            .unwrap();
        fsm.init(()).now_or_never().unwrap().unwrap();
        fsm.observe_shared(recorder.clone());

        fsm.fire("stay", ()).now_or_never().unwrap().unwrap();

        let events = recorder.events.lock().clone();
        prop_assert_eq!(events.contains(&"onLeaveState".to_string()), observe);
        prop_assert_eq!(events.contains(&"onEnterState".to_string()), observe);
        prop_assert_eq!(events.len(), if observe { 11 } else { 6 });
        prop_assert!(fsm.is("idle"));
    }

    #[test]
    fn synchronous_fires_never_leave_pending(
        fires in prop::collection::vec(arbitrary_transition(), 0..15),
    ) {
        let fsm = StateMachineBuilder::<(), ()>::new()
            .init("idle")
            .transition(TransitionBuilder::new().name("walk").from("idle").to("walking"))
            .unwrap()
            .transition(TransitionBuilder::new().name("run").from("walking").to("running"))
            .unwrap()
            .transition(TransitionBuilder::new().name("rest").to("resting"))
            .unwrap()
            .build()
            .unwrap();
        fsm.init(()).now_or_never().unwrap().unwrap();

        for transition in fires {
            let allowed = fsm.can(transition);
            let before = fsm.state();
            let result = fsm.fire(transition, ()).now_or_never().unwrap();

            prop_assert_eq!(result.is_ok(), allowed);
            if !allowed {
                prop_assert_eq!(fsm.state(), before);
            }
            prop_assert!(!fsm.is_pending());
            prop_assert!(fsm.all_states().contains(&fsm.state()));
        }
    }

    #[test]
    fn camelize_is_stable_on_its_output(label in label()) {
        let once = camelize(&label);
        prop_assert_eq!(camelize(&once), once.clone());
        prop_assert!(!once.contains(['_', '-']));
        prop_assert!(prepended("on", &label).starts_with("on"));
    }

    #[test]
    fn history_path_follows_recorded_transitions(
        states in prop::collection::vec(arbitrary_state(), 1..10)
    ) {
        let mut history = StateHistory::new();
        let mut from = "none";
        for to in &states {
            history = history.record(StateTransition {
                transition: "step".to_string(),
                from: from.to_string(),
                to: to.to_string(),
                timestamp: Utc::now(),
            });
            from = *to;
        }

        let path = history.get_path();
        prop_assert_eq!(path.len(), states.len() + 1);
        prop_assert_eq!(path[0], "none");
        prop_assert_eq!(&path[1..], states.as_slice());
    }

    #[test]
    fn history_roundtrip_serialization(
        states in prop::collection::vec(arbitrary_state(), 0..5)
    ) {
        let mut history = StateHistory::new();
        for to in &states {
            history = history.record(StateTransition {
                transition: "step".to_string(),
                from: "none".to_string(),
                to: to.to_string(),
                timestamp: Utc::now(),
            });
        }

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(history, deserialized);
    }
}
