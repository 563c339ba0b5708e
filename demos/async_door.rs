//! Asynchronous Door
//!
//! This example demonstrates observers that defer a transition until some
//! asynchronous work completes.
//!
//! Key concepts:
//! - Suspending a transition with `Response::defer`
//! - Rejecting overlapping transitions while one is pending
//! - Picking a target at fire time with a resolver
//! - Loading the machine from a JSON spec
//!
//! Run with: cargo run --example async_door

use lifecycle_fsm::builder::{MachineSpec, StateMachineBuilder, TransitionBuilder};
use lifecycle_fsm::effects::{FsmError, Handlers, ObserverError, Response};
use serde_json::json;
use std::time::Duration;

#[derive(Default)]
struct Door {
    locked: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Asynchronous Door ===\n");

    let spec = MachineSpec::from_json(
        r#"{
            "init": "closed",
            "transitions": [
                { "name": "close", "from": "open", "to": "closed" },
                { "name": "lock", "from": "closed", "to": "locked" },
                { "name": "unlock", "from": "locked", "to": "closed" }
            ]
        }"#,
    )?;

    let door = StateMachineBuilder::<Door, ()>::new()
        .spec(spec)
        .transition(
            TransitionBuilder::new()
                .name("open")
                .from("closed")
                .resolve(|door: &Door, _| (!door.locked).then(|| "open".to_string())),
        )?
        .methods(
            Handlers::<Door, ()>::new()
                .on("onLeaveClosed", |context, _| {
                    println!("  motor engaged for '{}'", context.transition);
                    Ok(Response::defer(async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(Some(json!("motor finished")))
                    }))
                })
                .on("onEnterLocked", |context, _| {
                    context.fsm().with_data_mut(|door| door.locked = true);
                    Ok(Response::Continue)
                })
                .on("onLeaveLocked", |context, _| {
                    context.fsm().with_data_mut(|door| door.locked = false);
                    Ok(Response::Continue)
                })
                .on("onBeforeClose", |_, _| {
                    Err(ObserverError::new("door is jammed"))
                }),
        )
        .build()?;

    door.init(()).await?;
    println!("Initial state: {}", door.state());

    let opening = door.fire("open", ());
    println!("Opening (suspended: {}, pending: {})", opening.is_suspended(), door.is_pending());

    match door.fire("lock", ()).await {
        Err(FsmError::PendingTransition { transition, .. }) => {
            println!("  '{transition}' rejected while the door is moving")
        }
        other => println!("  unexpected: {other:?}"),
    }

    let outcome = opening.await?;
    println!("Opened: {} ({:?})", door.state(), outcome.value());

    if let Err(error) = door.fire("close", ()).await {
        println!("Close failed: {error}; still {}", door.state());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
