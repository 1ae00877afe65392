//! Snapshot trait for store state values.
//!
//! A snapshot is the complete state value held by a store, or one region
//! of it. Snapshots are immutable values: every transition produces a new
//! one and comparisons are by value.

use std::fmt::Debug;

/// Trait for values a store can hold.
///
/// # Required Traits
///
/// - `Clone`: reducers build the next value from a copy of the current one
/// - `PartialEq`: the store compares next and current to detect identity transitions
/// - `Debug`: snapshots are debuggable for diagnostics
/// - `Send` + `Sync`: snapshots are shared with readers on other threads
///
/// Implemented for every type meeting the bounds.
///
/// # Example
///
/// ```rust
/// use unistore::core::Snapshot;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Clicks {
///     total: u32,
/// }
///
/// fn assert_snapshot<S: Snapshot>() {}
/// assert_snapshot::<Clicks>();
/// ```
pub trait Snapshot: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T> Snapshot for T where T: Clone + PartialEq + Debug + Send + Sync + 'static {}
