//! The state chart: tree store, current-state pointer, and the chaining API.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::core::error::ChartError;
use crate::core::log::TransitionLog;
use crate::core::state::{Behaviors, StateNode};
use crate::dsl::{parse_mapping, ChartSpec, Edge};

/// Name of the root state every chart is seeded with.
pub const ROOT: &str = "root";

pub(crate) type InitHook = Arc<dyn Fn(&mut StateChart) + Send + Sync>;

/// A hierarchical state machine.
///
/// A chart owns a tree of named states, a current-state pointer (always
/// exactly one declared state, initially the root), and a transition log.
/// States are declared with [`declare`](Self::declare), given behavior with
/// [`attach`](Self::attach), and driven with [`go`](Self::go) and
/// [`act`](Self::act).
///
/// Every operation returns the chart for chaining. Failures (undeclared
/// names, duplicate declarations, malformed mapping strings) warn through
/// `tracing` and leave the chart in its prior state; the `try_*` variants
/// surface them as [`ChartError`] instead.
///
/// # Example
///
/// ```rust
/// use trellis::core::{Behaviors, StateChart};
///
/// let mut player = StateChart::new();
/// player
///     .declare("root -> !stopped playing paused")
///     .attach(
///         "playing",
///         Behaviors::new().enter(|_chart, _inv| println!("rolling")),
///     )
///     .go("playing");
///
/// assert_eq!(player.current(), "playing");
/// ```
pub struct StateChart {
    pub(crate) states: BTreeMap<String, StateNode>,
    root: String,
    pub(crate) current: String,
    pub(crate) log: TransitionLog,
    pub(crate) on_init: Option<InitHook>,
}

impl StateChart {
    /// Create a chart holding only the root state.
    pub fn new() -> Self {
        let mut states = BTreeMap::new();
        states.insert(ROOT.to_string(), StateNode::new(None));
        Self {
            states,
            root: ROOT.to_string(),
            current: ROOT.to_string(),
            log: TransitionLog::new(),
            on_init: None,
        }
    }

    /// Name of the root state.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Name of the current state.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Whether `name` has been declared.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Look up a state's node.
    pub fn state(&self, name: &str) -> Option<&StateNode> {
        self.states.get(name)
    }

    /// Parent of `name`, `None` for the root or an unknown name.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.states.get(name).and_then(StateNode::parent)
    }

    /// Default substate of `name`, if it has one.
    pub fn default_substate_of(&self, name: &str) -> Option<&str> {
        self.states.get(name).and_then(StateNode::default_substate)
    }

    /// Names of the states whose parent is `name`, in lexicographic order.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, node)| node.parent.as_deref() == Some(name))
            .map(|(child, _)| child.as_str())
            .collect()
    }

    /// Rootward path from `name`: the state itself, then each ancestor up
    /// to and including the root. Empty for an unknown name.
    pub fn ancestry(&self, name: &str) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = self.states.contains_key(name).then(|| name.to_string());
        while let Some(state) = cursor {
            cursor = self.states.get(&state).and_then(|node| node.parent.clone());
            path.push(state);
        }
        path
    }

    /// The transition log.
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// Declare states, warning and no-opping on failure.
    ///
    /// Accepts any [`ChartSpec`] shape. A malformed mapping string is
    /// dropped (contributing zero declarations) and processing continues; a
    /// duplicate child is skipped with its original definition kept; an
    /// undeclared parent aborts the remainder of the call.
    pub fn declare(&mut self, spec: impl Into<ChartSpec>) -> &mut Self {
        'mappings: for mapping in spec.into().mappings() {
            let edges = match parse_mapping(&self.root, &mapping) {
                Ok(edges) => edges,
                Err(err) => {
                    warn!(%err, "mapping dropped");
                    continue;
                }
            };
            for edge in &edges {
                match self.declare_edge(edge) {
                    Ok(()) => {}
                    Err(err @ ChartError::DuplicateState(_)) => {
                        warn!(%err, "declaration skipped");
                    }
                    Err(err) => {
                        warn!(%err, "declaration aborted");
                        break 'mappings;
                    }
                }
            }
        }
        self
    }

    /// Declare states, stopping at the first failure.
    ///
    /// Edges applied before the failure stay applied; declaration is
    /// incremental by design.
    pub fn try_declare(&mut self, spec: impl Into<ChartSpec>) -> Result<(), ChartError> {
        for mapping in spec.into().mappings() {
            for edge in parse_mapping(&self.root, &mapping)? {
                self.declare_edge(&edge)?;
            }
        }
        Ok(())
    }

    /// Apply one structured declaration.
    ///
    /// This is the primitive the string notation reduces to. The parent
    /// must already exist and the child must not; a default-substate
    /// re-assignment overwrites the previous one with a warning.
    pub fn declare_edge(&mut self, edge: &Edge) -> Result<(), ChartError> {
        if !self.states.contains_key(&edge.parent) {
            return Err(ChartError::UndeclaredState(edge.parent.clone()));
        }
        if self.states.contains_key(&edge.child) {
            return Err(ChartError::DuplicateState(edge.child.clone()));
        }

        self.states.insert(
            edge.child.clone(),
            StateNode::new(Some(edge.parent.clone())),
        );

        if edge.is_default {
            if let Some(parent) = self.states.get_mut(&edge.parent) {
                if let Some(previous) = parent.default_substate.replace(edge.child.clone()) {
                    warn!(
                        state = %edge.parent,
                        previous = %previous,
                        new = %edge.child,
                        "default substate overwritten"
                    );
                }
            }
        }
        Ok(())
    }

    /// Attach behaviors to one or more states, warning on failure.
    ///
    /// `states` is a single name or a space-separated list. If any name is
    /// undeclared, nothing is attached.
    pub fn attach(&mut self, states: &str, behaviors: Behaviors) -> &mut Self {
        if let Err(err) = self.try_attach(states, behaviors) {
            warn!(%err, "behaviors not attached");
        }
        self
    }

    /// Attach behaviors, surfacing an undeclared name as an error.
    ///
    /// Every referenced state is checked before any registry is touched, so
    /// a failure means no partial attachment.
    pub fn try_attach(&mut self, states: &str, behaviors: Behaviors) -> Result<(), ChartError> {
        let names: Vec<&str> = states.split_whitespace().collect();
        for name in &names {
            if !self.states.contains_key(*name) {
                return Err(ChartError::UndeclaredState((*name).to_string()));
            }
        }

        let handlers = behaviors.into_handlers();
        for name in names {
            if let Some(node) = self.states.get_mut(name) {
                for (action, handler) in &handlers {
                    node.context.insert(action.clone(), Arc::clone(handler));
                }
            }
        }
        Ok(())
    }

    /// Attach several behavior bags at once, keyed by state-name group.
    pub fn attach_map<I, S>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, Behaviors)>,
        S: AsRef<str>,
    {
        for (states, behaviors) in entries {
            self.attach(states.as_ref(), behaviors);
        }
        self
    }

    /// Run the initialization hook recorded at build time, if any.
    pub fn init(&mut self) -> &mut Self {
        if let Some(hook) = self.on_init.clone() {
            hook(self);
        }
        self
    }
}

impl Default for StateChart {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateChart")
            .field("current", &self.current)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}
