//! Cache store: serialized article records plus the recency and view-count indexes.

pub mod codec;
pub mod keys;
pub mod memory;
pub mod redis;
pub mod types;

use crate::reader::ArticleRecord;
use async_trait::async_trait;

pub use keys::StoreKeys;
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;
pub use types::{RankedArticle, StoreError};

/// Key-value backend holding cached articles and their auxiliary indexes.
///
/// Each call maps to a single backend operation and relies on the backend's atomicity for
/// it; callers never get multi-step transactions.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Fetch the cached record for `url`. Absence is `Ok(None)`, not an error.
    async fn get(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError>;

    /// Persist `record` under `url`, overwriting any previous value.
    async fn set(&self, url: &str, record: &ArticleRecord) -> Result<(), StoreError>;

    /// Push `url` onto the head of the recency list.
    async fn push_recent(&self, url: &str) -> Result<(), StoreError>;

    /// Add one view to `url`, creating it at 1 when absent. Returns the new score.
    async fn increment_score(&self, url: &str) -> Result<u64, StoreError>;

    /// Up to `limit` most recently pushed URLs, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Up to `limit` URLs with the highest view counts, highest first.
    async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, StoreError>;
}
