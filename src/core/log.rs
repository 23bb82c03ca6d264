//! Transition log.
//!
//! Every completed transition hop (including each hop of a default-substate
//! cascade) is appended to the chart's log. The log is observability only;
//! nothing in the machine reads it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition hop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state that was current before the hop.
    pub from: String,
    /// The state that became current.
    pub to: String,
    /// When the hop completed.
    pub at: DateTime<Utc>,
}

/// Ordered log of transition hops.
///
/// The log is immutable in style: [`TransitionLog::record`] returns a new
/// log with the record appended, leaving the receiver unchanged.
///
/// # Example
///
/// ```rust
/// use trellis::core::{TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(TransitionRecord {
///     from: "root".to_string(),
///     to: "playing".to_string(),
///     at: Utc::now(),
/// });
///
/// assert_eq!(log.path(), vec!["root", "playing"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<TransitionRecord>,
}

impl TransitionLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning the new log.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All recorded hops in order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The most recent hop, if any.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// The states visited, in order: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Elapsed time between the first and last recorded hop.
    ///
    /// `None` when the log is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            last.at.signed_duration_since(first.at).to_std().ok()
        } else {
            None
        }
    }

    /// Number of recorded hops.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
