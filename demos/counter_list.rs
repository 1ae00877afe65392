//! Counter List
//!
//! This example demonstrates the synchronous half of the store.
//!
//! Key concepts:
//! - Dispatching typed actions and untyped action records
//! - Listeners that re-read state after each change
//! - Identity transitions for unknown ids and unknown kinds
//! - Dispatch history
//!
//! Run with: RUST_LOG=unistore=debug cargo run --example counter_list

use serde_json::json;
use tracing_subscriber::EnvFilter;
use unistore::app::{app_store, AppAction};
use unistore::regions::CounterAction;
use unistore::ActionRecord;

fn render(counters: &unistore::regions::Counters) -> String {
    counters
        .as_slice()
        .iter()
        .map(|c| format!("#{}={}", c.id, c.value))
        .collect::<Vec<_>>()
        .join("  ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Counter List Example ===\n");

    let store = app_store()?;

    let view = store.clone();
    let subscription = store.subscribe(move || {
        println!("  [view] {}", render(&view.get_state().counters));
    });

    println!("Initial: {}\n", render(&store.get_state().counters));

    println!("Incrementing counter 1 three times:");
    for _ in 0..3 {
        store.dispatch(AppAction::from(CounterAction::Increment { id: 1 }))?;
    }

    println!("\nDecrementing counter 2 below zero:");
    store.dispatch(CounterAction::Decrement { id: 2 }.into())?;

    println!("\nIncrementing a counter that does not exist (no notification):");
    store.dispatch(CounterAction::Increment { id: 42 }.into())?;

    println!("\nDispatching untyped records:");
    store.dispatch_record(ActionRecord::with_payload(
        "counter/increment",
        json!({ "id": 2 }),
    ))?;
    store.dispatch_record(ActionRecord::new("ui/resized"))?;

    subscription.unsubscribe();
    store.dispatch(CounterAction::Increment { id: 1 }.into())?;
    println!("\nAfter unsubscribing: {}", render(&store.get_state().counters));

    let history = store.history();
    println!("\nHistory ({} dispatches, {} changes):", history.len(), history.changes());
    for record in history.records() {
        println!("  {:<20} changed={}", record.kind, record.changed);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
