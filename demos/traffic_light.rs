//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine with lifecycle observers.
//!
//! Key concepts:
//! - Declaring transitions with the `transitions!` macro
//! - A wildcard transition available from every state
//! - Vetoing a transition from a `before` observer
//! - Recording committed changes with the history plugin
//!
//! Run with: cargo run --example traffic_light

use futures::FutureExt;
use lifecycle_fsm::builder::StateMachineBuilder;
use lifecycle_fsm::effects::{Handlers, Response};
use lifecycle_fsm::plugin::TransitionHistory;
use lifecycle_fsm::transitions;
use std::sync::Arc;

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let history = Arc::new(TransitionHistory::new());
    let light = StateMachineBuilder::<u32, ()>::new()
        .init("red")
        .transitions(transitions! {
            "go": "red" => "green",
            "slow": "green" => "yellow",
            "stop": "yellow" => "red",
            "fault": * => "blinking",
        })
        .methods(
            Handlers::<u32, ()>::new()
                .on("onEnterGreen", |context, _| {
                    context.fsm().with_data_mut(|cycles| *cycles += 1);
                    Ok(Response::Continue)
                })
                .on("onBeforeGo", |context, _| {
                    // Two full cycles, then the light stays red.
                    if context.fsm().with_data(|cycles| *cycles) >= 2 {
                        Ok(Response::Cancel)
                    } else {
                        Ok(Response::Continue)
                    }
                }),
        )
        .plugin(Arc::clone(&history))
        .build()
        .unwrap();

    light.init(()).now_or_never().unwrap().unwrap();
    println!("Initial state: {}", light.state());

    for transition in ["go", "slow", "stop", "go", "slow", "stop", "go"] {
        let outcome = light.fire(transition, ()).now_or_never().unwrap().unwrap();
        if outcome.is_cancelled() {
            println!("  {transition:<5} vetoed, still {}", light.state());
        } else {
            println!("  {transition:<5} -> {}", light.state());
        }
    }

    println!("\nAvailable from {}: {:?}", light.state(), light.transitions());

    light.fire("fault", ()).now_or_never().unwrap().unwrap();
    println!("After fault: {}", light.state());

    println!("\nPath: {}", history.history().get_path().join(" -> "));
    println!("Green phases: {}", light.with_data(|cycles| *cycles));

    println!("\n=== Example Complete ===");
}
