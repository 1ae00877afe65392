//! Build errors for stores and combined reducers.

use crate::regions::ViolationError;
use thiserror::Error;

/// Errors that can occur when building stores and reducers.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Reducer not specified. Call .reducer(reducer) before .build()")]
    MissingReducer,

    #[error("Region key '{key}' is already used by another slice")]
    DuplicateSlice { key: String },

    #[error("Initial state failed validation: {}", describe(.0))]
    InvalidInitialState(Vec<ViolationError>),
}

fn describe(violations: &[ViolationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
