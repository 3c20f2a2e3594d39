//! Reader service coordinating the cache store and the extractor.

use crate::{
    config::DEFAULT_EXTRACT_TIMEOUT,
    extractor::{ExtractedArticle, ExtractionError, Extractor},
    metrics::{MetricsSnapshot, RetrievalMetrics},
    reader::types::{ArticleRecord, ReaderError},
    store::{ArticleStore, RankedArticle},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Read-through retrieval of articles backed by the cache store.
///
/// A lookup that finds a record serves it and bumps its view count. A lookup that finds
/// nothing runs the extractor, stores the result and pushes the URL onto the recency list.
/// A lookup that fails (backend error or undecodable entry) yields a degraded record and
/// never falls back to extraction, so a cache outage cannot turn into an extraction storm.
///
/// Side-effect writes are awaited inline, but their failures are only logged and counted.
/// Concurrent misses for one URL may both extract; the last write wins and the recency list
/// may then hold the URL twice.
///
/// Construct the service once near process start and share it through an `Arc`.
pub struct ReaderService {
    store: Arc<dyn ArticleStore>,
    extractor: Arc<dyn Extractor>,
    extract_timeout: Duration,
    metrics: Arc<RetrievalMetrics>,
}

/// Abstraction over the reader used by the HTTP surface.
#[async_trait]
pub trait ReaderApi: Send + Sync {
    /// Return the article for `url`. Never fails; failures come back as degraded records.
    async fn retrieve(&self, url: &str) -> ArticleRecord;

    /// Up to `limit` most recently extracted URLs, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<String>, ReaderError>;

    /// Up to `limit` most viewed URLs, highest view count first.
    async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, ReaderError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl ReaderService {
    /// Build a reader over an already connected store and extractor.
    pub fn new(store: Arc<dyn ArticleStore>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            store,
            extractor,
            extract_timeout: DEFAULT_EXTRACT_TIMEOUT,
            metrics: Arc::new(RetrievalMetrics::new()),
        }
    }

    /// Override the extraction deadline.
    pub fn with_extract_timeout(mut self, timeout: Duration) -> Self {
        self.extract_timeout = timeout;
        self
    }

    /// Return the cached article for `url`, extracting it on a miss.
    pub async fn retrieve(&self, url: &str) -> ArticleRecord {
        match self.store.get(url).await {
            Ok(Some(record)) => self.serve_cached(url, record).await,
            Ok(None) => self.fetch_fresh(url).await,
            Err(error) => {
                self.metrics.record_store_failure();
                tracing::error!(url, error = %error, "Cache lookup failed; not extracting");
                ArticleRecord::failed(url, error.to_string())
            }
        }
    }

    async fn serve_cached(&self, url: &str, record: ArticleRecord) -> ArticleRecord {
        self.metrics.record_hit();
        tracing::info!(url, "Serving article from cache");
        if let Err(error) = self.store.increment_score(url).await {
            self.metrics.record_write_failure();
            tracing::warn!(url, error = %error, "Failed to record article view");
        }
        record
    }

    async fn fetch_fresh(&self, url: &str) -> ArticleRecord {
        self.metrics.record_miss();
        tracing::debug!(url, timeout = ?self.extract_timeout, "Cache miss; extracting");

        match self.extract_with_deadline(url).await {
            Ok(ExtractedArticle { title, content }) => {
                let record = ArticleRecord::new(url, title, content);
                self.persist(&record).await;
                record
            }
            Err(error) => {
                self.metrics.record_extraction_failure();
                tracing::warn!(url, error = %error, "Extraction failed");
                ArticleRecord::failed(url, error.to_string())
            }
        }
    }

    /// Run the extractor, dropping its future once the deadline passes.
    async fn extract_with_deadline(&self, url: &str) -> Result<ExtractedArticle, ExtractionError> {
        let timeout = self.extract_timeout;
        tokio::time::timeout(timeout, self.extractor.extract(url, timeout))
            .await
            .unwrap_or(Err(ExtractionError::Timeout(timeout)))
    }

    /// Cache a fresh record and announce it on the recency list.
    ///
    /// The two writes are independent: each is attempted, and each failure is logged and
    /// counted on its own without reaching the caller.
    async fn persist(&self, record: &ArticleRecord) {
        let url = record.url.as_str();
        let cached = self.store.set(url, record).await;
        if let Err(error) = &cached {
            self.metrics.record_write_failure();
            tracing::warn!(url, error = %error, "Failed to cache article");
        }
        let listed = self.store.push_recent(url).await;
        if let Err(error) = &listed {
            self.metrics.record_write_failure();
            tracing::warn!(url, error = %error, "Failed to push article onto recency list");
        }
        if cached.is_ok() && listed.is_ok() {
            tracing::debug!(url, "Article cached");
        }
    }

    /// Up to `limit` most recently extracted URLs, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<String>, ReaderError> {
        self.store.recent(limit).await.map_err(|error| {
            tracing::error!(limit, error = %error, "Failed to list recent articles");
            ReaderError::from(error)
        })
    }

    /// Up to `limit` most viewed URLs, highest view count first.
    pub async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, ReaderError> {
        self.store.top_viewed(limit).await.map_err(|error| {
            tracing::error!(limit, error = %error, "Failed to list popular articles");
            ReaderError::from(error)
        })
    }

    /// Return the current retrieval metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl ReaderApi for ReaderService {
    async fn retrieve(&self, url: &str) -> ArticleRecord {
        ReaderService::retrieve(self, url).await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<String>, ReaderError> {
        ReaderService::list_recent(self, limit).await
    }

    async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, ReaderError> {
        ReaderService::top_viewed(self, limit).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        ReaderService::metrics_snapshot(self)
    }
}
