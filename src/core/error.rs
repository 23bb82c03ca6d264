//! Errors surfaced by the strict (`try_*`) chart operations.

use thiserror::Error;

/// Failures that the fire-and-forget operations downgrade to warnings.
///
/// The chaining API (`declare`, `attach`, `go`) never returns these; it
/// logs and no-ops instead. The `try_*` variants surface them for callers
/// that want declarations checked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("state `{0}` is not declared")]
    UndeclaredState(String),

    #[error("state `{0}` is already declared; the original definition is kept")]
    DuplicateState(String),

    #[error("mapping `{0}` is malformed: more than one `->` separator")]
    MalformedMapping(String),
}
