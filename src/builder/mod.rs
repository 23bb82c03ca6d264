//! Builder API for ergonomic chart construction.
//!
//! This module provides a fluent builder and a macro for assembling charts
//! with minimal boilerplate.

pub mod chart;
pub mod macros;

pub use chart::ChartBuilder;

use crate::core::StateChart;
use crate::dsl::ChartSpec;

/// Create a chart and declare its tree in one call.
///
/// # Example
///
/// ```rust
/// use trellis::builder::chart;
///
/// let player = chart(vec!["root -> !stopped playing", "playing -> buffering"]);
///
/// assert!(player.contains("buffering"));
/// assert_eq!(player.default_substate_of("root"), Some("stopped"));
/// ```
pub fn chart(spec: impl Into<ChartSpec>) -> StateChart {
    let mut chart = StateChart::new();
    chart.declare(spec);
    chart
}
