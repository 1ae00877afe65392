//! Error types for dispatching, reducing and normalizing actions.

use thiserror::Error;

/// Errors returned by [`Store::dispatch`](crate::store::Store::dispatch).
///
/// In every case the store's snapshot is left exactly as it was before
/// the failing call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Dispatch of '{kind}' attempted while a reducer is running")]
    ReentrantDispatch { kind: String },

    #[error(transparent)]
    Reducer(#[from] ReduceError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Failure raised by a fallible reducer.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Reducer for region '{region}' failed: {message}")]
pub struct ReduceError {
    pub region: String,
    pub message: String,
}

impl ReduceError {
    pub fn new(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            message: message.into(),
        }
    }
}

/// Errors normalizing an [`ActionRecord`](crate::core::ActionRecord) into a typed action.
///
/// Unknown kinds are never an error; only known kinds with a payload of
/// the wrong shape are rejected.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action '{kind}' requires a payload")]
    MissingPayload { kind: String },

    #[error("Action '{kind}' has a malformed payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
