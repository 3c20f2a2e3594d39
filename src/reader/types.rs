//! Core data types and error definitions for article retrieval.

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Article returned to callers and, when extraction succeeded, persisted in the cache.
///
/// A non-empty `error_message` marks a degraded record: title and content are empty and the
/// record is never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleRecord {
    /// Canonical lookup key, the URL exactly as submitted.
    pub url: String,
    /// Extracted title, possibly empty.
    pub title: String,
    /// Sanitized HTML body, possibly empty.
    pub content: String,
    /// Reason the article could not be produced; empty on success.
    pub error_message: String,
}

impl ArticleRecord {
    /// Successfully extracted article.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
            error_message: String::new(),
        }
    }

    /// Degraded record carrying only the URL and the failure reason.
    pub fn failed(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error_message: error_message.into(),
            ..Self::default()
        }
    }

    /// Whether the record describes a failure rather than an article.
    pub fn is_degraded(&self) -> bool {
        !self.error_message.is_empty()
    }
}

/// Errors surfaced by the listing operations.
///
/// Single-article retrieval never fails; its errors are folded into [`ArticleRecord`].
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The cache store could not serve the listing.
    #[error("Cache store request failed: {0}")]
    Store(#[from] StoreError),
}
