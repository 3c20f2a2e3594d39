//! Extractor adapter: turns a URL into a title and a sanitized content body.

pub mod http;
pub mod readability;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use http::HttpExtractor;

/// Errors raised while fetching or parsing an upstream page.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input is not an absolute `http`/`https` URL.
    #[error("Invalid article URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as submitted by the caller.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },
    /// The upstream fetch failed before a response arrived.
    #[error("Failed to fetch article: {0}")]
    Network(#[source] reqwest::Error),
    /// The fetch or parse did not finish in time.
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
    /// Upstream answered with a non-success status.
    #[error("Upstream responded with {0}")]
    UpstreamStatus(reqwest::StatusCode),
    /// Upstream served something other than HTML.
    #[error("Unsupported content type '{0}', expected HTML")]
    NotHtml(String),
    /// Page was fetched but no readable article could be derived from it.
    #[error("Failed to parse article: {0}")]
    Parse(String),
}

/// Title and body derived from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Article title, possibly empty.
    pub title: String,
    /// Sanitized HTML body.
    pub content: String,
}

/// Interface implemented by extraction backends.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch and parse `url`, giving up after `timeout`.
    async fn extract(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<ExtractedArticle, ExtractionError>;
}
