//! Event bus and scheduler working together.
//!
//! This example demonstrates the companion utilities:
//! - namespaced publish fan-out (general subscribers hear specific events)
//! - one-shot subscriptions
//! - a scheduler publishing an event on a timer
//!
//! Run with: cargo run --example bus_and_timer

use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trellis::bus::EventBus;
use trellis::timer::Scheduler;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().init();

    println!("=== Event Bus & Scheduler ===\n");

    let bus = Arc::new(Mutex::new(EventBus::new()));

    {
        let mut bus = bus.lock().unwrap();
        bus.subscribe("player", |_| {
            println!("  [player] something happened");
        });
        bus.subscribe("player:track", |args| {
            println!("  [player:track] event with args {args:?}");
        });
        bus.subscribe_once("player:track:changed", |args| {
            println!("  [once] first track change: {}", args[0]);
        });
    }

    println!("publishing player:track:changed (notifies prefixes, general first):");
    bus.lock()
        .unwrap()
        .publish("player:track:changed", &[json!("side-b")]);

    println!("\npublishing it again (the once-subscriber is gone):");
    bus.lock()
        .unwrap()
        .publish("player:track:changed", &[json!("side-a")]);

    println!("\narming a heartbeat every 200ms:");
    let heartbeat_bus = Arc::clone(&bus);
    let mut heartbeat = Scheduler::new(move || {
        heartbeat_bus.lock().unwrap().publish("player:heartbeat", &[]);
    });
    heartbeat.repeat(Duration::from_millis(200));

    tokio::time::sleep(Duration::from_millis(700)).await;
    heartbeat.stop();
    println!("\nheartbeat stopped; firing one more by hand:");
    heartbeat.now();
}
