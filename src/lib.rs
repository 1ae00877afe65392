//! Unistore: a unidirectional state store.
//!
//! State lives in one immutable snapshot owned by a [`Store`]. Callers
//! dispatch actions; a pure reducer computes the next snapshot from the
//! current one; listeners are told that something changed and read the
//! state themselves.
//!
//! # Core Concepts
//!
//! - **Action**: an immutable value describing an intended transition
//! - **Reducer**: a pure, total function `(state, action) -> state`
//! - **Region**: an independently reduced part of the snapshot
//! - **Store**: owner of the snapshot, serializing dispatches
//! - **Async operation**: pending / fulfilled / rejected actions around
//!   one external call
//!
//! # Example
//!
//! ```rust
//! use unistore::core::fallible;
//! use unistore::regions::{counter_reducer, Counter, CounterAction, Counters};
//! use unistore::Store;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let store = Store::new(
//!     Counters::new(vec![Counter::new(1, 0), Counter::new(2, 0)]),
//!     fallible(counter_reducer),
//! );
//!
//! let notified = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&notified);
//! let subscription = store.subscribe(move || {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! for _ in 0..3 {
//!     store.dispatch(CounterAction::Increment { id: 1 }).unwrap();
//! }
//! subscription.unsubscribe();
//!
//! assert_eq!(store.get_state().get(1), Some(&Counter::new(1, 3)));
//! assert_eq!(notified.load(Ordering::SeqCst), 3);
//! ```

pub mod app;
pub mod builder;
pub mod core;
pub mod effects;
pub mod error;
pub mod regions;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Action, ActionRecord, Reducer, Snapshot};
pub use builder::{BuildError, StoreBuilder};
pub use effects::AsyncOperation;
pub use error::{ActionError, ReduceError, StoreError};
pub use store::{Store, StoreConfig, Subscription};
