//! The transition engine: lowest-common-ancestor sequencing and
//! default-substate cascading.

use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::core::chart::StateChart;
use crate::core::error::ChartError;
use crate::core::log::TransitionRecord;
use crate::core::state::{Flow, Invocation, Lifecycle};

impl StateChart {
    /// Transition to `target`, warning and no-opping on an unknown name.
    ///
    /// A transition exits every state from the current one up to (but not
    /// including) the lowest common ancestor, enters every state from below
    /// the ancestor down to the target, moves the pointer, runs the
    /// target's `stay` hook, and then cascades into the target's default
    /// substate chain. Transitioning to the current state does nothing;
    /// no hooks fire.
    ///
    /// A [`Flow::Halt`] from an `exit` or `enter` hook skips the remaining
    /// hooks of that phase; the transition itself still completes.
    pub fn go(&mut self, target: &str) -> &mut Self {
        if let Err(err) = self.try_go(target) {
            warn!(%err, "transition dropped");
        }
        self
    }

    /// Transition to `target`, surfacing an unknown name as an error.
    pub fn try_go(&mut self, target: &str) -> Result<(), ChartError> {
        if !self.contains(target) {
            return Err(ChartError::UndeclaredState(target.to_string()));
        }
        self.transition_to(target.to_string());
        Ok(())
    }

    fn transition_to(&mut self, target: String) {
        if self.current == target {
            return;
        }

        // Phase lists are fixed here; a hook that re-targets the machine
        // takes effect only after this transition completes.
        let (exits, entries) = self.paths_between(&self.current, &target);

        for state in &exits {
            if self.run_hook(state, Lifecycle::Exit) == Flow::Halt {
                break;
            }
        }
        for state in &entries {
            if self.run_hook(state, Lifecycle::Enter) == Flow::Halt {
                break;
            }
        }

        let from = std::mem::replace(&mut self.current, target.clone());
        self.log = self.log.record(TransitionRecord {
            from,
            to: target.clone(),
            at: Utc::now(),
        });

        self.run_hook(&target, Lifecycle::Stay);

        if let Some(next) = self
            .states
            .get(&target)
            .and_then(|node| node.default_substate.clone())
        {
            self.transition_to(next);
        }
    }

    /// Exit and entry paths between two declared states.
    ///
    /// The exit list runs from `from` up to, excluding, the lowest common
    /// ancestor; the entry list from just below the ancestor down to `to`.
    fn paths_between(&self, from: &str, to: &str) -> (Vec<String>, Vec<String>) {
        let mut exits = self.ancestry(from);
        let mut entries = self.ancestry(to);

        let lca = exits
            .iter()
            .enumerate()
            .find_map(|(i, ancestor)| entries.iter().position(|e| e == ancestor).map(|j| (i, j)));

        if let Some((i, j)) = lca {
            exits.truncate(i);
            entries.truncate(j);
            entries.reverse();
        }
        (exits, entries)
    }

    fn run_hook(&mut self, state: &str, hook: Lifecycle) -> Flow {
        let handler = self
            .states
            .get(state)
            .and_then(|node| node.context.get(hook.as_str()))
            .map(Arc::clone);

        match handler {
            Some(handler) => {
                let inv = Invocation {
                    state: state.to_string(),
                    action: hook.as_str().to_string(),
                    args: Vec::new(),
                };
                handler(self, &inv)
            }
            None => Flow::Continue,
        }
    }
}
