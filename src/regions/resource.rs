//! Async resource region and its three-phase lifecycle.
//!
//! An external operation named `op` is represented as three ordinary
//! actions: `<op>/pending`, `<op>/fulfilled` and `<op>/rejected`. The
//! reducer for a region only reacts to actions carrying its own operation
//! name, so several resources can share one action type.

use crate::core::{Action, ActionRecord, Reducer};
use crate::error::{ActionError, ReduceError};
use crate::regions::violations::{ViolationError, Violations};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;

pub const PENDING: &str = "pending";
pub const FULFILLED: &str = "fulfilled";
pub const REJECTED: &str = "rejected";

/// Lifecycle status of an async resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl Status {
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// True once the most recent operation completed, either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Items fetched by an external operation plus the operation's status.
///
/// `error_message` is present exactly when `status` is [`Status::Failed`].
/// The fields are private so that only lifecycle transitions can set them;
/// a region read from a serialized document is checked with
/// [`ResourceRegion::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceRegion<T> {
    items: Vec<T>,
    status: Status,
    error_message: Option<String>,
}

impl<T> Default for ResourceRegion<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> ResourceRegion<T> {
    /// Empty region that has never been loaded.
    pub fn idle() -> Self {
        Self {
            items: Vec::new(),
            status: Status::Idle,
            error_message: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Check that an error message is present exactly when the status is failed.
    pub fn validate(&self, region: &str) -> Violations {
        let message = match (self.status, &self.error_message) {
            (Status::Failed, None) => "failed status without an error message",
            (status, Some(_)) if status != Status::Failed => {
                "error message present while status is not failed"
            }
            _ => return Validation::success(()),
        };
        Validation::fail(ViolationError::InconsistentRegion {
            region: region.to_string(),
            message: message.to_string(),
        })
    }
}

impl<T: Clone> ResourceRegion<T> {
    fn loading(&self) -> Self {
        Self {
            items: self.items.clone(),
            status: Status::Loading,
            error_message: None,
        }
    }

    fn succeeded(items: Vec<T>) -> Self {
        Self {
            items,
            status: Status::Succeeded,
            error_message: None,
        }
    }

    // Prior items are kept so the last good content can still be shown.
    fn failed(&self, message: &str) -> Self {
        Self {
            items: self.items.clone(),
            status: Status::Failed,
            error_message: Some(message.to_string()),
        }
    }
}

/// One phase of an async operation's lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AsyncAction<T> {
    Pending { op: String },
    Fulfilled { op: String, payload: T },
    Rejected { op: String, message: String },
}

impl<T> AsyncAction<T> {
    /// Name of the operation this action belongs to.
    pub fn op(&self) -> &str {
        match self {
            Self::Pending { op } | Self::Fulfilled { op, .. } | Self::Rejected { op, .. } => op,
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            Self::Pending { .. } => PENDING,
            Self::Fulfilled { .. } => FULFILLED,
            Self::Rejected { .. } => REJECTED,
        }
    }

    /// Whether this action belongs to operation `op`.
    pub fn matches(&self, op: &str) -> bool {
        self.op() == op
    }
}

impl<T> Action for AsyncAction<T>
where
    T: Clone + std::fmt::Debug + Send + Sync + 'static,
{
    fn kind(&self) -> String {
        format!("{}/{}", self.op(), self.phase())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RejectionPayload {
    Message { message: String },
    Text(String),
}

impl<T: DeserializeOwned> AsyncAction<T> {
    /// Normalize a record of kind `<op>/<phase>` for operation `op`.
    ///
    /// Returns `Ok(None)` when the kind belongs to another operation or does
    /// not end in a lifecycle phase. Payloads are only inspected for `op`.
    pub fn from_record(record: &ActionRecord, op: &str) -> Result<Option<Self>, ActionError> {
        let Some((prefix, phase)) = record.kind.rsplit_once('/') else {
            return Ok(None);
        };
        if prefix != op {
            return Ok(None);
        }
        let op = op.to_string();

        let action = match phase {
            PENDING => Self::Pending { op },
            FULFILLED => Self::Fulfilled {
                op,
                payload: parse_payload(record)?,
            },
            REJECTED => {
                let message = match parse_payload::<RejectionPayload>(record)? {
                    RejectionPayload::Message { message } => message,
                    RejectionPayload::Text(text) => text,
                };
                Self::Rejected { op, message }
            }
            _ => return Ok(None),
        };

        Ok(Some(action))
    }
}

fn parse_payload<P: DeserializeOwned>(record: &ActionRecord) -> Result<P, ActionError> {
    let payload = record
        .payload
        .clone()
        .ok_or_else(|| ActionError::MissingPayload {
            kind: record.kind.clone(),
        })?;
    serde_json::from_value(payload).map_err(|source| ActionError::MalformedPayload {
        kind: record.kind.clone(),
        source,
    })
}

/// Reducer for a resource region driven by the operation named `op`.
///
/// Actions for other operations leave the region unchanged.
#[derive(Clone, Debug)]
pub struct ResourceReducer {
    op: String,
}

impl ResourceReducer {
    pub fn new(op: impl Into<String>) -> Self {
        Self { op: op.into() }
    }

    pub fn op(&self) -> &str {
        &self.op
    }
}

impl<T> Reducer<ResourceRegion<T>, AsyncAction<Vec<T>>> for ResourceReducer
where
    T: Clone,
{
    fn reduce(
        &self,
        region: &ResourceRegion<T>,
        action: &AsyncAction<Vec<T>>,
    ) -> Result<ResourceRegion<T>, ReduceError> {
        if !action.matches(&self.op) {
            return Ok(region.clone());
        }

        let next = match action {
            AsyncAction::Pending { .. } => region.loading(),
            AsyncAction::Fulfilled { payload, .. } => ResourceRegion::succeeded(payload.clone()),
            AsyncAction::Rejected { message, .. } => region.failed(message),
        };
        Ok(next)
    }
}
