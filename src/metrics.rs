use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing retrieval activity since startup.
#[derive(Default)]
pub struct RetrievalMetrics {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    extraction_failures: AtomicU64,
    store_failures: AtomicU64,
    write_failures: AtomicU64,
}

impl RetrievalMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request served from the cache.
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that found no cached entry and went to the extractor.
    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an extraction that produced a degraded record.
    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache lookup that failed on the backend or while decoding.
    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a best-effort write (cache fill, recency push, view increment) that failed.
    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of retrieval counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Requests answered from the cache.
    pub cache_hits: u64,
    /// Requests that required a fresh extraction.
    pub cache_misses: u64,
    /// Fresh extractions that failed.
    pub extraction_failures: u64,
    /// Lookups rejected because the store failed or held an undecodable entry.
    pub store_failures: u64,
    /// Side-effect writes that failed and were swallowed.
    pub write_failures: u64,
}
