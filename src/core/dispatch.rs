//! Action dispatch: rootward bubbling with short-circuit.

use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::core::chart::StateChart;
use crate::core::state::{Flow, Invocation};

impl StateChart {
    /// Dispatch an action with no arguments.
    ///
    /// Lookup starts at the current state and bubbles rootward: each state
    /// whose context defines the action has its handler invoked, most
    /// specific first, until a handler returns [`Flow::Halt`] or the root
    /// is exhausted. A state with no handler is skipped silently; absence
    /// is normal, not an error.
    pub fn act(&mut self, action: &str) -> &mut Self {
        self.act_with(action, &[])
    }

    /// Dispatch an action with arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trellis::core::{Behaviors, StateChart};
    /// use serde_json::json;
    ///
    /// let mut chart = StateChart::new();
    /// chart
    ///     .declare("root -> playing")
    ///     .attach(
    ///         "playing",
    ///         Behaviors::new().on("volume", |_chart, inv| {
    ///             println!("volume set to {}", inv.args[0]);
    ///         }),
    ///     )
    ///     .go("playing")
    ///     .act_with("volume", &[json!(11)]);
    /// ```
    pub fn act_with(&mut self, action: &str, args: &[Value]) -> &mut Self {
        let start = self.current().to_string();
        self.bubble(start, action, args);
        self
    }

    /// Dispatch an action starting from an explicit state.
    ///
    /// This is how a handler scopes further actions to its own state
    /// rather than the machine's current one: pass
    /// [`Invocation::state`](crate::core::Invocation) back in. Warns and
    /// no-ops when `scope` is not declared.
    pub fn act_from(&mut self, scope: &str, action: &str, args: &[Value]) -> &mut Self {
        if self.contains(scope) {
            self.bubble(scope.to_string(), action, args);
        } else {
            warn!(state = scope, action, "dispatch scope is not declared");
        }
        self
    }

    fn bubble(&mut self, start: String, action: &str, args: &[Value]) {
        let mut scope = Some(start);
        while let Some(state) = scope {
            let handler = self
                .states
                .get(&state)
                .and_then(|node| node.context.get(action))
                .map(Arc::clone);

            if let Some(handler) = handler {
                let inv = Invocation {
                    state: state.clone(),
                    action: action.to_string(),
                    args: args.to_vec(),
                };
                if handler(self, &inv) == Flow::Halt {
                    return;
                }
            }

            scope = self.states.get(&state).and_then(|node| node.parent.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Behaviors;
    use serde_json::json;
    use std::sync::Mutex;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn handler(trace: &Trace, label: &str) -> Behaviors {
        let trace = Arc::clone(trace);
        let label = label.to_string();
        Behaviors::new().on("ping", move |_, _| trace.lock().unwrap().push(label.clone()))
    }

    fn drain(trace: &Trace) -> Vec<String> {
        std::mem::take(&mut *trace.lock().unwrap())
    }

    #[test]
    fn most_specific_handler_runs_first_then_bubbles() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare(vec!["root -> a", "a -> b"]);
        chart.attach("root", handler(&t, "root"));
        chart.attach("a", handler(&t, "a"));
        chart.attach("b", handler(&t, "b"));

        chart.go("b").act("ping");

        assert_eq!(drain(&t), vec!["b", "a", "root"]);
    }

    #[test]
    fn halt_stops_the_walk() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare(vec!["root -> a", "a -> b"]);
        chart.attach("root", handler(&t, "root"));
        chart.attach("a", handler(&t, "a"));
        let halted = Arc::clone(&t);
        chart.attach(
            "b",
            Behaviors::new().on_flow("ping", move |_, _| {
                halted.lock().unwrap().push("b".to_string());
                Flow::Halt
            }),
        );

        chart.go("b").act("ping");

        assert_eq!(drain(&t), vec!["b"]);
    }

    #[test]
    fn gaps_in_the_chain_are_skipped() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare(vec!["root -> a", "a -> b"]);
        chart.attach("root", handler(&t, "root"));
        // `a` defines nothing for "ping".
        chart.attach("b", handler(&t, "b"));

        chart.go("b").act("ping");

        assert_eq!(drain(&t), vec!["b", "root"]);
    }

    #[test]
    fn unhandled_action_is_silent() {
        let mut chart = StateChart::new();
        chart.declare("root -> a");

        chart.go("a").act("nobody-home");

        assert_eq!(chart.current(), "a");
    }

    #[test]
    fn arguments_reach_the_handler() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare("root -> a");
        let seen = Arc::clone(&t);
        chart.attach(
            "a",
            Behaviors::new().on("volume", move |_, inv| {
                seen.lock().unwrap().push(inv.args[0].to_string());
            }),
        );

        chart.go("a").act_with("volume", &[json!(11)]);

        assert_eq!(drain(&t), vec!["11"]);
    }

    #[test]
    fn handler_may_transition_the_machine() {
        let mut chart = StateChart::new();
        chart.declare("root -> a b");
        chart.attach(
            "a",
            Behaviors::new().on("advance", |chart, _| {
                chart.go("b");
            }),
        );

        chart.go("a").act("advance");

        assert_eq!(chart.current(), "b");
    }

    #[test]
    fn act_from_starts_at_the_given_scope() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare(vec!["root -> a", "a -> b"]);
        chart.attach("root", handler(&t, "root"));
        chart.attach("a", handler(&t, "a"));
        chart.attach("b", handler(&t, "b"));
        chart.go("b");

        chart.act_from("a", "ping", &[]);

        // `b` is current but the walk starts at `a`.
        assert_eq!(drain(&t), vec!["a", "root"]);
    }

    #[test]
    fn act_from_unknown_scope_is_a_noop() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare("root -> a");
        chart.attach("root", handler(&t, "root"));

        chart.act_from("ghost", "ping", &[]);

        assert!(drain(&t).is_empty());
    }

    #[test]
    fn invocation_names_the_visited_state() {
        let t = Trace::default();
        let mut chart = StateChart::new();
        chart.declare("root -> a");
        let seen = Arc::clone(&t);
        let shared = Behaviors::new().on("ping", move |_, inv| {
            seen.lock().unwrap().push(inv.state.clone());
        });
        chart.attach("root a", shared);

        chart.go("a").act("ping");

        // The same handler reports each state it bubbles through.
        assert_eq!(drain(&t), vec!["a", "root"]);
    }
}
