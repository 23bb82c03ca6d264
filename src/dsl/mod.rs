//! Declaration notation for building state trees.
//!
//! The structured primitive is the [`Edge`]: one `(parent, child,
//! is_default)` triple. The string grammar is a convenience layered on top:
//!
//! ```text
//! parent -> child1 child2 ... childN
//! ```
//!
//! A child prefixed with `!` becomes its parent's default substate. A
//! string with no `->` declares children of the root. More than one `->`
//! is malformed and contributes nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ChartError;

/// Marker prefix for a default substate in mapping notation.
pub const DEFAULT_MARKER: char = '!';

/// One parent/child declaration extracted from a spec.
///
/// This is the operation the tree-construction invariants are defined on;
/// everything else in this module just produces edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Name of the (already declared) parent state.
    pub parent: String,
    /// Name of the state to create.
    pub child: String,
    /// Whether the child becomes the parent's default substate.
    pub is_default: bool,
}

/// Parse one mapping string into edges.
///
/// `root` is substituted as the parent when the string has no `->`.
///
/// # Example
///
/// ```rust
/// use trellis::dsl::parse_mapping;
///
/// let edges = parse_mapping("root", "player -> !stopped playing paused").unwrap();
/// assert_eq!(edges.len(), 3);
/// assert_eq!(edges[0].child, "stopped");
/// assert!(edges[0].is_default);
/// assert!(!edges[1].is_default);
/// ```
pub fn parse_mapping(root: &str, input: &str) -> Result<Vec<Edge>, ChartError> {
    let parts: Vec<&str> = input.split("->").collect();
    let (parent, children) = match parts.as_slice() {
        [children] => (root, *children),
        [parent, children] => (parent.trim(), *children),
        _ => return Err(ChartError::MalformedMapping(input.to_string())),
    };

    Ok(children
        .split_whitespace()
        .map(|token| match token.strip_prefix(DEFAULT_MARKER) {
            Some(name) => Edge {
                parent: parent.to_string(),
                child: name.to_string(),
                is_default: true,
            },
            None => Edge {
                parent: parent.to_string(),
                child: token.to_string(),
                is_default: false,
            },
        })
        .collect())
}

/// The input shapes accepted by declaration.
///
/// Deserializes untagged, so a tree layout can come straight out of JSON
/// configuration: a single mapping string, a list of mapping strings, or a
/// table of parent name to space-separated children.
///
/// # Example
///
/// ```rust
/// use trellis::dsl::ChartSpec;
///
/// let spec: ChartSpec = serde_json::from_str(
///     r#"["player -> !stopped playing", "playing -> buffering"]"#,
/// ).unwrap();
/// assert_eq!(spec.mappings().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartSpec {
    /// `"parent -> child1 child2"`, or a bare child list under the root.
    Mapping(String),
    /// A sequence of mapping strings, applied in order.
    Many(Vec<String>),
    /// Parent name to space-separated children.
    ///
    /// Entries apply in lexicographic key order. When one entry's parent is
    /// another entry's child, that order can reference the parent before it
    /// exists; use the string forms (which apply in written order) for
    /// multi-level declarations.
    Table(BTreeMap<String, String>),
}

impl ChartSpec {
    /// Normalize the spec to a list of mapping strings.
    pub fn mappings(&self) -> Vec<String> {
        match self {
            Self::Mapping(s) => vec![s.clone()],
            Self::Many(list) => list.clone(),
            Self::Table(table) => table
                .iter()
                .map(|(parent, children)| format!("{parent} -> {children}"))
                .collect(),
        }
    }
}

impl From<&str> for ChartSpec {
    fn from(s: &str) -> Self {
        Self::Mapping(s.to_string())
    }
}

impl From<String> for ChartSpec {
    fn from(s: String) -> Self {
        Self::Mapping(s)
    }
}

impl From<Vec<String>> for ChartSpec {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

impl From<Vec<&str>> for ChartSpec {
    fn from(list: Vec<&str>) -> Self {
        Self::Many(list.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ChartSpec {
    fn from(list: [&str; N]) -> Self {
        Self::Many(list.iter().map(|s| s.to_string()).collect())
    }
}

impl From<BTreeMap<String, String>> for ChartSpec {
    fn from(table: BTreeMap<String, String>) -> Self {
        Self::Table(table)
    }
}
