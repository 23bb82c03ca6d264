//! Builder for constructing state charts.

use crate::core::{Behaviors, ChartError, InitHook, StateChart};
use crate::dsl::ChartSpec;
use std::sync::Arc;

/// Builder for assembling a chart's tree, behaviors, and init hook in one
/// fluent expression.
///
/// # Example
///
/// ```rust
/// use trellis::builder::ChartBuilder;
/// use trellis::core::Behaviors;
///
/// let mut player = ChartBuilder::new()
///     .states("root -> !stopped playing paused")
///     .attach(
///         "playing",
///         Behaviors::new().enter(|_chart, _inv| println!("rolling")),
///     )
///     .on_init(|chart| {
///         chart.go("playing");
///     })
///     .build();
///
/// player.init();
/// assert_eq!(player.current(), "playing");
/// ```
#[derive(Default)]
pub struct ChartBuilder {
    specs: Vec<ChartSpec>,
    attachments: Vec<(String, Behaviors)>,
    on_init: Option<InitHook>,
}

impl ChartBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration spec. May be called repeatedly; specs apply in
    /// the order given.
    pub fn states(mut self, spec: impl Into<ChartSpec>) -> Self {
        self.specs.push(spec.into());
        self
    }

    /// Attach behaviors to a state-name group once the tree is built.
    pub fn attach(mut self, states: impl Into<String>, behaviors: Behaviors) -> Self {
        self.attachments.push((states.into(), behaviors));
        self
    }

    /// Record a hook to run when the finished chart's
    /// [`init`](StateChart::init) is called.
    pub fn on_init<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut StateChart) + Send + Sync + 'static,
    {
        self.on_init = Some(Arc::new(f));
        self
    }

    /// Build the chart, downgrading any declaration or attachment failure
    /// to a warning.
    pub fn build(self) -> StateChart {
        let mut chart = StateChart::new();
        for spec in self.specs {
            chart.declare(spec);
        }
        for (states, behaviors) in self.attachments {
            chart.attach(&states, behaviors);
        }
        chart.on_init = self.on_init;
        chart
    }

    /// Build the chart, stopping at the first failure.
    pub fn try_build(self) -> Result<StateChart, ChartError> {
        let mut chart = StateChart::new();
        for spec in self.specs {
            chart.try_declare(spec)?;
        }
        for (states, behaviors) in self.attachments {
            chart.try_attach(&states, behaviors)?;
        }
        chart.on_init = self.on_init;
        Ok(chart)
    }
}
