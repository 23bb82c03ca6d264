//! Media player statechart.
//!
//! This example demonstrates the core machine:
//! - declaring a state tree in mapping notation, with default substates
//! - lifecycle hooks and user actions per state
//! - action bubbling with an explicit halt
//!
//! Run with: cargo run --example media_player

use serde_json::json;
use trellis::{behaviors, Behaviors, Flow, StateChart};

fn main() {
    tracing_subscriber::fmt().init();

    let mut player = StateChart::new();
    player
        .declare(vec![
            "root -> !stopped playing paused",
            "playing -> !normal shuffle",
        ])
        .attach(
            "stopped",
            behaviors! {
                play: |chart, _inv| { chart.go("playing"); },
            },
        )
        .attach(
            "playing",
            behaviors! {
                enter: |_chart, _inv| println!("  (deck spinning up)"),
                exit: |_chart, _inv| println!("  (deck spinning down)"),
                pause: |chart, _inv| { chart.go("paused"); },
                volume: |_chart, inv| println!("  volume set to {}", inv.args[0]),
            },
        )
        .attach(
            "paused",
            behaviors! {
                play: |chart, _inv| { chart.go("playing"); },
            },
        )
        // Root-level fallback: runs for any state that lets "status" bubble.
        .attach(
            "root",
            Behaviors::new().on("status", |chart, _inv| {
                println!("  status: current state is `{}`", chart.current());
            }),
        )
        // Shuffle answers "status" itself and stops the bubble.
        .attach(
            "shuffle",
            Behaviors::new().on_flow("status", |_chart, _inv| {
                println!("  status: shuffling");
                Flow::Halt
            }),
        );

    println!("=== Media Player ===\n");

    player.go("stopped");
    println!("start: {}", player.current());

    println!("\npressing play:");
    player.act("play");
    println!("now: {} (playing cascaded into its default)", player.current());

    println!("\nsetting volume (handled by `playing`, an ancestor):");
    player.act_with("volume", &[json!(11)]);

    println!("\nasking for status (bubbles to root):");
    player.act("status");

    println!("\nswitching to shuffle, asking again (halts at shuffle):");
    player.go("shuffle");
    player.act("status");

    println!("\npausing:");
    player.act("pause");
    println!("now: {}", player.current());

    println!("\nvisited: {}", player.log().path().join(" -> "));
}
