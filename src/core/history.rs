//! Dispatch history tracking.
//!
//! Records which actions reached a store, in order, and whether each one
//! changed the snapshot. History is immutable: recording returns a new value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single dispatch.
///
/// # Example
///
/// ```rust
/// use unistore::core::DispatchRecord;
/// use chrono::Utc;
///
/// let record = DispatchRecord {
///     kind: "counter/increment".to_string(),
///     timestamp: Utc::now(),
///     changed: true,
/// };
/// assert!(record.changed);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Kind tag of the dispatched action
    pub kind: String,
    /// When the dispatch completed
    pub timestamp: DateTime<Utc>,
    /// Whether the reducer produced a different snapshot
    pub changed: bool,
}

/// Ordered, optionally bounded history of dispatches.
///
/// When a limit is set the oldest records are dropped once it is reached.
///
/// # Example
///
/// ```rust
/// use unistore::core::{ActionHistory, DispatchRecord};
/// use chrono::Utc;
///
/// let history = ActionHistory::new();
/// let history = history.record(DispatchRecord {
///     kind: "fetchPosts/pending".to_string(),
///     timestamp: Utc::now(),
///     changed: true,
/// });
/// let history = history.record(DispatchRecord {
///     kind: "fetchPosts/fulfilled".to_string(),
///     timestamp: Utc::now(),
///     changed: true,
/// });
///
/// assert_eq!(history.kinds(), vec!["fetchPosts/pending", "fetchPosts/fulfilled"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionHistory {
    records: VecDeque<DispatchRecord>,
    limit: Option<usize>,
}

impl ActionHistory {
    /// Create a new unbounded history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history keeping at most `limit` records.
    pub fn bounded(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Record a dispatch, returning a new history.
    ///
    /// The existing history is not modified.
    pub fn record(&self, record: DispatchRecord) -> Self {
        let mut next = self.clone();
        next.push(record);
        next
    }

    /// Append a dispatch in place, dropping the oldest past the limit.
    pub fn push(&mut self, record: DispatchRecord) {
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Kind tags in dispatch order.
    pub fn kinds(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.kind.as_str()).collect()
    }

    /// Number of recorded dispatches that changed the snapshot.
    pub fn changes(&self) -> usize {
        self.records.iter().filter(|r| r.changed).count()
    }

    /// Time between the first and last recorded dispatch.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Iterate over all records in order.
    pub fn records(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
