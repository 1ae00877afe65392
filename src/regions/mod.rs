//! Region state and reducers.
//!
//! - `counter`: a list of integer counters addressed by id
//! - `resource`: items loaded by an external async operation plus its status

pub mod counter;
pub mod resource;
pub mod violations;

pub use counter::{counter_reducer, Counter, CounterAction, Counters};
pub use resource::{AsyncAction, ResourceReducer, ResourceRegion, Status};
pub use violations::{into_violations, ViolationError, Violations};
