//! Actions: immutable records describing an intended state transition.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for values that can be dispatched to a store.
///
/// Actions are plain values. They carry no identity and no ordering
/// token; ordering comes entirely from the order of dispatch calls.
///
/// # Example
///
/// ```rust
/// use unistore::core::Action;
///
/// #[derive(Clone, Debug)]
/// enum Toggle {
///     On,
///     Off,
/// }
///
/// impl Action for Toggle {
///     fn kind(&self) -> String {
///         match self {
///             Self::On => "toggle/on".to_string(),
///             Self::Off => "toggle/off".to_string(),
///         }
///     }
/// }
///
/// assert_eq!(Toggle::On.kind(), "toggle/on");
/// ```
pub trait Action: Clone + Debug + Send + Sync + 'static {
    /// The kind tag identifying this action, used for logging and history.
    fn kind(&self) -> String;
}

/// Untyped `{kind, payload?}` shape of an action.
///
/// This is the only wire-level shape in the crate. Typed action families
/// normalize from it with `TryFrom<ActionRecord>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ActionRecord {
    /// Create a record with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Create a record carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }
}

impl Action for ActionRecord {
    fn kind(&self) -> String {
        self.kind.clone()
    }
}
