//! Builder API for ergonomic store construction.

pub mod error;
pub mod store;

pub use error::BuildError;
pub use store::StoreBuilder;
