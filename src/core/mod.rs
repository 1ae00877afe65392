//! Core store types and logic.
//!
//! This module contains the pure functional core of the store:
//! - Snapshot values via the `Snapshot` trait
//! - Actions and the untyped `ActionRecord` shape
//! - Reducers, including keyed composition of regions
//! - Immutable dispatch history
//!
//! Nothing here holds state or performs side effects; the `store` module
//! is the stateful wrapper around it.

mod action;
mod history;
mod reducer;
mod snapshot;

pub use action::{Action, ActionRecord};
pub use history::{ActionHistory, DispatchRecord};
pub use reducer::{fallible, CombinedReducer, Fallible, Reducer, Slice};
pub use snapshot::Snapshot;
