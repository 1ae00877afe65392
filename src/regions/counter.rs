//! Counter list region.
//!
//! Counters are created with the initial snapshot and never deleted. Their
//! values change only through increment and decrement actions addressed by id.

use crate::core::{Action, ActionRecord};
use crate::error::{ActionError, ReduceError};
use crate::regions::violations::{ViolationError, Violations};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::validation::Validation;

pub const INCREMENT: &str = "counter/increment";
pub const DECREMENT: &str = "counter/decrement";

const REGION: &str = "counters";

/// A single counter. `id` is fixed for the counter's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: u64,
    pub value: i64,
}

impl Counter {
    pub fn new(id: u64, value: i64) -> Self {
        Self { id, value }
    }
}

/// Ordered list of counters with unique ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counters(Vec<Counter>);

impl Counters {
    pub fn new(counters: Vec<Counter>) -> Self {
        Self(counters)
    }

    pub fn as_slice(&self) -> &[Counter] {
        &self.0
    }

    /// Look up a counter by id.
    pub fn get(&self, id: u64) -> Option<&Counter> {
        self.0.iter().find(|c| c.id == id)
    }

    /// Check that ids are unique, reporting every duplicate.
    pub fn validate(&self) -> Violations {
        let mut seen = HashSet::new();
        let checks: Vec<Violations> = self
            .0
            .iter()
            .map(|counter| {
                if seen.insert(counter.id) {
                    Validation::success(())
                } else {
                    Validation::fail(ViolationError::DuplicateCounterId { id: counter.id })
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// New region with counter `id` changed by `delta`, or `None` if absent.
    fn adjusted(&self, id: u64, delta: i64) -> Result<Option<Self>, ReduceError> {
        let Some(target) = self.get(id) else {
            return Ok(None);
        };
        let value = target
            .value
            .checked_add(delta)
            .ok_or_else(|| ReduceError::new(REGION, format!("counter {id} overflows")))?;

        Ok(Some(Self(
            self.0
                .iter()
                .map(|c| if c.id == id { Counter::new(id, value) } else { *c })
                .collect(),
        )))
    }
}

impl From<Vec<Counter>> for Counters {
    fn from(counters: Vec<Counter>) -> Self {
        Self(counters)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAction {
    Increment { id: u64 },
    Decrement { id: u64 },
}

impl Action for CounterAction {
    fn kind(&self) -> String {
        match self {
            Self::Increment { .. } => INCREMENT.to_string(),
            Self::Decrement { .. } => DECREMENT.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct IdPayload {
    id: u64,
}

impl CounterAction {
    /// Normalize a record into a counter action.
    ///
    /// Returns `Ok(None)` for kinds outside the counter family.
    pub fn from_record(record: &ActionRecord) -> Result<Option<Self>, ActionError> {
        let make: fn(u64) -> Self = match record.kind.as_str() {
            INCREMENT => |id| Self::Increment { id },
            DECREMENT => |id| Self::Decrement { id },
            _ => return Ok(None),
        };

        let payload = record
            .payload
            .clone()
            .ok_or_else(|| ActionError::MissingPayload {
                kind: record.kind.clone(),
            })?;
        let IdPayload { id } =
            serde_json::from_value(payload).map_err(|source| ActionError::MalformedPayload {
                kind: record.kind.clone(),
                source,
            })?;

        Ok(Some(make(id)))
    }
}

/// Reducer for the counter region.
///
/// A missing id leaves the region unchanged. A step past `i64::MAX` or
/// `i64::MIN` fails, so the store keeps its previous snapshot. Wrap with
/// [`fallible`](crate::core::fallible) to hand it to a store.
pub fn counter_reducer(
    counters: &Counters,
    action: &CounterAction,
) -> Result<Counters, ReduceError> {
    let adjusted = match *action {
        CounterAction::Increment { id } => counters.adjusted(id, 1)?,
        CounterAction::Decrement { id } => counters.adjusted(id, -1)?,
    };
    Ok(adjusted.unwrap_or_else(|| counters.clone()))
}
