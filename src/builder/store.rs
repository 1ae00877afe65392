//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::core::{Action, Reducer, Snapshot};
use crate::regions::{into_violations, Violations};
use crate::store::{Store, StoreConfig};
use stillwater::validation::Validation;

/// Check run against the initial snapshot when the store is built.
type StateCheck<S> = Box<dyn Fn(&S) -> Violations + Send + Sync>;

/// Builder for constructing stores with a fluent API.
///
/// Initial-state checks are all run, and every violation they report is
/// returned together rather than stopping at the first.
pub struct StoreBuilder<S, A> {
    initial: Option<S>,
    reducer: Option<Box<dyn Reducer<S, A>>>,
    checks: Vec<StateCheck<S>>,
    config: StoreConfig,
}

impl<S: Snapshot, A: Action> StoreBuilder<S, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            reducer: None,
            checks: Vec::new(),
            config: StoreConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the top-level reducer (required).
    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Add a validation check for the initial state.
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&S) -> Violations + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.config.history_limit = limit;
        self
    }

    pub fn notify_unchanged(mut self, notify: bool) -> Self {
        self.config.notify_unchanged = notify;
        self
    }

    /// Build the store.
    /// Returns an error if required fields are missing or the initial
    /// state fails validation.
    pub fn build(self) -> Result<Store<S, A>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;

        let checks: Vec<Violations> = self.checks.iter().map(|check| check(&initial)).collect();
        let violations = into_violations(Validation::all_vec(checks).map(|_| ()));
        if !violations.is_empty() {
            return Err(BuildError::InvalidInitialState(violations));
        }

        tracing::debug!(config = ?self.config, "store built");
        Ok(Store::from_parts(initial, reducer, self.config))
    }
}

impl<S: Snapshot, A: Action> Default for StoreBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
