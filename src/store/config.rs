//! Store configuration.

use serde::{Deserialize, Serialize};

/// Tunable store behavior.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use unistore::store::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "notify_unchanged": true }"#).unwrap();
/// assert!(config.notify_unchanged);
/// assert!(config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Record every dispatch into the store's history
    pub record_history: bool,

    /// Maximum number of history records kept; `None` keeps everything
    pub history_limit: Option<usize>,

    /// Notify listeners even when a dispatch leaves the snapshot unchanged
    pub notify_unchanged: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: Some(256),
            notify_unchanged: false,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
