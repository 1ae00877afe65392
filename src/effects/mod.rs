//! Async operation orchestration.
//!
//! This module is the "imperative shell" around the store: it performs
//! the one external call and turns its outcome into ordinary actions.
//! The store never learns that the three actions belong together;
//! correlation is by operation name only.
//!
//! Operation bodies can be plain futures or Stillwater effects run
//! against an environment.

mod operation;

pub use operation::AsyncOperation;
