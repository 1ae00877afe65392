//! Stateful wrapper around a reducer.
//!
//! The store owns the current snapshot, serializes dispatches and fans
//! change notifications out to listeners.

mod config;
#[allow(clippy::module_inception)]
mod store;

pub use config::StoreConfig;
pub use store::{Store, Subscription};
