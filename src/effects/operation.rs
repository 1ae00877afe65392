//! Three-phase orchestration around one external async call.

use crate::core::{Action, Snapshot};
use crate::error::StoreError;
use crate::regions::{AsyncAction, ResourceReducer};
use crate::store::Store;
use std::fmt::Display;
use std::future::Future;
use stillwater::effect::Effect;
use tracing::Instrument;
use uuid::Uuid;

/// A named external operation and its lifecycle actions.
///
/// Each run dispatches `<name>/pending`, awaits the operation body once,
/// then dispatches either `<name>/fulfilled` with the result or
/// `<name>/rejected` with the error's message. Nothing is retried.
///
/// Concurrent runs of the same operation are not coalesced. Whichever
/// completes last determines the region's final status and items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncOperation {
    name: String,
}

impl AsyncOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pending<T>(&self) -> AsyncAction<T> {
        AsyncAction::Pending {
            op: self.name.clone(),
        }
    }

    pub fn fulfilled<T>(&self, payload: T) -> AsyncAction<T> {
        AsyncAction::Fulfilled {
            op: self.name.clone(),
            payload,
        }
    }

    pub fn rejected<T>(&self, message: impl Into<String>) -> AsyncAction<T> {
        AsyncAction::Rejected {
            op: self.name.clone(),
            message: message.into(),
        }
    }

    /// Reducer for the region this operation loads.
    pub fn reducer(&self) -> ResourceReducer {
        ResourceReducer::new(self.name.clone())
    }

    /// Run `operation` and dispatch its lifecycle into `store`.
    ///
    /// The only errors returned are dispatch failures. A failed operation
    /// is reported through the rejected action, not to the caller.
    pub async fn run<S, A, T, E, Fut>(
        &self,
        store: &Store<S, A>,
        operation: Fut,
    ) -> Result<(), StoreError>
    where
        S: Snapshot,
        A: Action + From<AsyncAction<T>>,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let invocation = Uuid::new_v4();
        let span = tracing::info_span!("async_operation", op = %self.name, %invocation);

        async {
            store.dispatch(A::from(self.pending()))?;

            match operation.await {
                Ok(value) => {
                    tracing::debug!("operation fulfilled");
                    store.dispatch(A::from(self.fulfilled(value)))
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::warn!(error = %message, "operation rejected");
                    store.dispatch(A::from(self.rejected(message)))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run a stillwater effect against `env` as the operation body.
    pub async fn run_effect<S, A, T, Eff, Env>(
        &self,
        store: &Store<S, A>,
        effect: Eff,
        env: &Env,
    ) -> Result<(), StoreError>
    where
        S: Snapshot,
        A: Action + From<AsyncAction<T>>,
        Eff: Effect<Output = T, Env = Env>,
        Eff::Error: Display,
        Env: Clone + Send + Sync + 'static,
    {
        self.run(store, effect.run(env)).await
    }
}
