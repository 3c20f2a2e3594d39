//! Shared types used by the store backends.

use serde::Serialize;
use thiserror::Error;

/// Errors returned while interacting with the cache store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend connection or command failed.
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
    /// Record could not be serialized for storage.
    #[error("Failed to encode article record: {0}")]
    Encode(String),
    /// Stored payload could not be turned back into a record.
    #[error("Failed to decode cached article: {0}")]
    Decode(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(error: ::redis::RedisError) -> Self {
        Self::Unavailable(error.to_string())
    }
}

/// Entry of the view-count ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedArticle {
    /// Article URL.
    pub url: String,
    /// Number of times the article was served from the cache.
    pub views: u64,
}
