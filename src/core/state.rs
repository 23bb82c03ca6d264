//! State nodes and the behaviors attached to them.
//!
//! Every state in a chart is a [`StateNode`]: a parent reference, an
//! optional default substate, and a registry of named handlers (its
//! "context"). Handlers are attached through the [`Behaviors`] builder and
//! invoked with the owning [`StateChart`](crate::core::StateChart) as
//! receiver.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::chart::StateChart;

/// Control signal returned by every handler.
///
/// Returning [`Flow::Halt`] from an action handler stops the bubbling walk
/// at that state; returning it from an `enter`/`exit` hook skips the
/// remaining hooks of the same transition phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep going: bubble to the ancestor, or run the next hook.
    Continue,
    /// Stop here.
    Halt,
}

/// The reserved lifecycle hook names.
///
/// Lifecycle hooks live in the same per-state registry as user actions,
/// keyed by these names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Runs on every state walked into during a transition.
    Enter,
    /// Runs on every state walked out of during a transition.
    Exit,
    /// Runs on the new current state once a transition lands.
    Stay,
}

impl Lifecycle {
    /// The registry key for this hook.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Stay => "stay",
        }
    }
}

/// What a handler is told about the call that reached it.
///
/// `state` is the name of the state whose context defined the handler;
/// during bubbling this is the state currently being visited, not
/// necessarily the machine's current state. Handlers that need to dispatch
/// further actions scoped to their own state can pass it to
/// [`StateChart::act_from`].
#[derive(Clone, Debug)]
pub struct Invocation {
    /// The state whose context the handler was found in.
    pub state: String,
    /// The action or lifecycle name that was dispatched.
    pub action: String,
    /// Arguments given to the dispatch call. Empty for lifecycle hooks.
    pub args: Vec<Value>,
}

/// A behavior invoked with the machine as receiver.
pub type Handler = Arc<dyn Fn(&mut StateChart, &Invocation) -> Flow + Send + Sync>;

/// One node in the state tree.
///
/// Nodes are created only by declaration and never removed; the parent
/// reference is fixed at declaration time.
#[derive(Clone)]
pub struct StateNode {
    pub(crate) parent: Option<String>,
    pub(crate) default_substate: Option<String>,
    pub(crate) context: BTreeMap<String, Handler>,
}

impl StateNode {
    pub(crate) fn new(parent: Option<String>) -> Self {
        Self {
            parent,
            default_substate: None,
            context: BTreeMap::new(),
        }
    }

    /// Name of the parent state, `None` only for the root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The child entered automatically when this state becomes current.
    pub fn default_substate(&self) -> Option<&str> {
        self.default_substate.as_deref()
    }

    /// Whether this state's own context defines `action`.
    ///
    /// Ancestor contexts are not consulted; that is what bubbling is for.
    pub fn handles(&self, action: &str) -> bool {
        self.context.contains_key(action)
    }

    /// Names of the handlers defined directly on this state.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.context.keys().map(String::as_str)
    }
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("parent", &self.parent)
            .field("default_substate", &self.default_substate)
            .field("context", &self.context.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A bag of named behaviors to attach to one or more states.
///
/// # Example
///
/// ```rust
/// use trellis::core::{Behaviors, Flow};
///
/// let behaviors = Behaviors::new()
///     .enter(|_chart, _inv| println!("entering"))
///     .on("play", |_chart, _inv| println!("play pressed"))
///     .on_flow("seek", |_chart, _inv| Flow::Halt);
///
/// assert!(behaviors.defines("enter"));
/// assert!(behaviors.defines("play"));
/// ```
#[derive(Clone, Default)]
pub struct Behaviors {
    handlers: BTreeMap<String, Handler>,
}

impl Behaviors {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a bag holding only a `stay` handler.
    ///
    /// Attaching a single behavior with no name means "run this whenever
    /// the state becomes current".
    pub fn just<F>(f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) + Send + Sync + 'static,
    {
        Self::new().stay(f)
    }

    /// Add a handler that always lets dispatch continue.
    pub fn on<F>(mut self, action: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) + Send + Sync + 'static,
    {
        self.handlers.insert(
            action.into(),
            Arc::new(move |chart, inv| {
                f(chart, inv);
                Flow::Continue
            }),
        );
        self
    }

    /// Add a handler that controls dispatch through its [`Flow`] result.
    pub fn on_flow<F>(mut self, action: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) -> Flow + Send + Sync + 'static,
    {
        self.handlers.insert(action.into(), Arc::new(f));
        self
    }

    /// Add an `enter` hook.
    pub fn enter<F>(self, f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) + Send + Sync + 'static,
    {
        self.on(Lifecycle::Enter.as_str(), f)
    }

    /// Add an `exit` hook.
    pub fn exit<F>(self, f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) + Send + Sync + 'static,
    {
        self.on(Lifecycle::Exit.as_str(), f)
    }

    /// Add a `stay` hook.
    pub fn stay<F>(self, f: F) -> Self
    where
        F: Fn(&mut StateChart, &Invocation) + Send + Sync + 'static,
    {
        self.on(Lifecycle::Stay.as_str(), f)
    }

    /// Whether the bag defines `action`.
    pub fn defines(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    /// Number of handlers in the bag.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn into_handlers(self) -> BTreeMap<String, Handler> {
        self.handlers
    }
}

impl fmt::Debug for Behaviors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviors")
            .field("actions", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_names_are_reserved_strings() {
        assert_eq!(Lifecycle::Enter.as_str(), "enter");
        assert_eq!(Lifecycle::Exit.as_str(), "exit");
        assert_eq!(Lifecycle::Stay.as_str(), "stay");
    }

    #[test]
    fn behaviors_collects_named_handlers() {
        let behaviors = Behaviors::new()
            .on("play", |_, _| {})
            .on("pause", |_, _| {})
            .enter(|_, _| {});

        assert_eq!(behaviors.len(), 3);
        assert!(behaviors.defines("play"));
        assert!(behaviors.defines("pause"));
        assert!(behaviors.defines("enter"));
        assert!(!behaviors.defines("stop"));
    }

    #[test]
    fn just_is_sugar_for_stay() {
        let behaviors = Behaviors::just(|_, _| {});

        assert_eq!(behaviors.len(), 1);
        assert!(behaviors.defines(Lifecycle::Stay.as_str()));
    }

    #[test]
    fn on_wraps_handlers_to_continue() {
        let mut handlers = Behaviors::new().on("noop", |_, _| {}).into_handlers();
        let handler = handlers.remove("noop").unwrap();

        let mut chart = StateChart::new();
        let inv = Invocation {
            state: "root".to_string(),
            action: "noop".to_string(),
            args: Vec::new(),
        };

        assert_eq!(handler(&mut chart, &inv), Flow::Continue);
    }

    #[test]
    fn on_flow_preserves_halt() {
        let mut handlers = Behaviors::new()
            .on_flow("veto", |_, _| Flow::Halt)
            .into_handlers();
        let handler = handlers.remove("veto").unwrap();

        let mut chart = StateChart::new();
        let inv = Invocation {
            state: "root".to_string(),
            action: "veto".to_string(),
            args: Vec::new(),
        };

        assert_eq!(handler(&mut chart, &inv), Flow::Halt);
    }

    #[test]
    fn later_handler_with_same_name_overwrites() {
        let behaviors = Behaviors::new()
            .on_flow("play", |_, _| Flow::Halt)
            .on("play", |_, _| {});

        assert_eq!(behaviors.len(), 1);
        let handler = behaviors.into_handlers().remove("play").unwrap();

        let mut chart = StateChart::new();
        let inv = Invocation {
            state: "root".to_string(),
            action: "play".to_string(),
            args: Vec::new(),
        };

        // The second registration won, so the handler continues.
        assert_eq!(handler(&mut chart, &inv), Flow::Continue);
    }

    #[test]
    fn node_reports_its_own_actions_only() {
        let mut node = StateNode::new(Some("root".to_string()));
        node.context
            .insert("play".to_string(), Arc::new(|_, _| Flow::Continue));

        assert!(node.handles("play"));
        assert!(!node.handles("enter"));
        assert_eq!(node.actions().collect::<Vec<_>>(), vec!["play"]);
        assert_eq!(node.parent(), Some("root"));
        assert_eq!(node.default_substate(), None);
    }
}
