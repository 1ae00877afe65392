//! Violations found while validating an initial snapshot.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single rule broken by an initial snapshot.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViolationError {
    #[error("Counter id {id} appears more than once")]
    DuplicateCounterId { id: u64 },

    #[error("Region '{region}' is inconsistent: {message}")]
    InconsistentRegion { region: String, message: String },
}

/// Outcome of validating a snapshot, accumulating every violation.
pub type Violations = Validation<(), NonEmptyVec<ViolationError>>;

/// Flatten a validation into the list of violations it reports.
pub fn into_violations(validation: Violations) -> Vec<ViolationError> {
    match validation {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
