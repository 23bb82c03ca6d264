//! Trellis: a hierarchical state machine (statechart) library.
//!
//! Application control flow is declared as a tree of named states instead
//! of ad-hoc conditionals and flags. Each state may carry named behaviors;
//! transitions run `exit` and `enter` hooks along the paths to and from the
//! lowest common ancestor, cascade into default substates, and actions
//! bubble up the ancestor chain until a state handles them.
//!
//! # Core Concepts
//!
//! - **StateChart**: the machine, a tree of named states plus a single
//!   current state
//! - **Behaviors**: named handlers (lifecycle hooks and user actions)
//!   attached per state
//! - **Bubbling**: action dispatch walks from the current state toward the
//!   root, most specific handler first
//!
//! # Example
//!
//! ```rust
//! use trellis::{Behaviors, StateChart};
//!
//! let mut player = StateChart::new();
//! player
//!     .declare(vec![
//!         "root -> !stopped playing paused",
//!         "playing -> !normal shuffle",
//!     ])
//!     .attach(
//!         "stopped",
//!         Behaviors::new().on("play", |chart, _inv| {
//!             chart.go("playing");
//!         }),
//!     )
//!     .go("stopped");
//!
//! assert_eq!(player.current(), "stopped");
//!
//! // "play" is handled by the stopped state; entering playing cascades
//! // into its default substate.
//! player.act("play");
//! assert_eq!(player.current(), "normal");
//! ```

pub mod builder;
pub mod bus;
pub mod core;
pub mod dsl;
pub mod timer;

// Re-export commonly used types
pub use builder::ChartBuilder;
pub use core::{Behaviors, ChartError, Flow, Invocation, Lifecycle, StateChart};
pub use dsl::ChartSpec;
