//! Post-fetching collaborator.

use crate::app::Post;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Unavailable(String),

    #[error("Failed to decode posts: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Capability returning an ordered list of posts, or failing.
pub trait PostSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Post>, SourceError>> + Send;
}

/// Source answering every fetch with the same canned response.
///
/// A successful response is a JSON array of posts, decoded on each fetch.
#[derive(Clone, Debug)]
pub struct StaticSource {
    response: Result<String, String>,
}

impl StaticSource {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            response: Ok(body.into()),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

impl PostSource for StaticSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Post>, SourceError>> + Send {
        let result: Result<Vec<Post>, SourceError> = match &self.response {
            Ok(body) => serde_json::from_str(body).map_err(SourceError::from),
            Err(message) => Err(SourceError::Unavailable(message.clone())),
        };
        async move { result }
    }
}
