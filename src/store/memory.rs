//! In-process store with the same contract and key layout as the Redis backend.
//!
//! Records are kept in their encoded form so lookups go through the same codec as Redis.
//! Useful for local development and tests; nothing is shared across processes.

use crate::reader::ArticleRecord;
use crate::store::{ArticleStore, RankedArticle, StoreError, StoreKeys, codec};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// Mutex-guarded map standing in for a Redis instance.
#[derive(Default)]
pub struct MemoryStore {
    keys: StoreKeys,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
    recent: VecDeque<String>,
    views: HashMap<String, u64>,
}

impl MemoryStore {
    /// Create an empty store using the default key layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw payload under `url`, bypassing the codec.
    pub async fn insert_raw(&self, url: &str, payload: impl Into<Vec<u8>>) {
        let key = self.keys.article(url);
        self.state.lock().await.entries.insert(key, payload.into());
    }

    /// Whether a record payload exists for `url`.
    pub async fn contains(&self, url: &str) -> bool {
        let key = self.keys.article(url);
        self.state.lock().await.entries.contains_key(&key)
    }

    /// Current view count of `url`, `None` when it was never served from cache.
    pub async fn views(&self, url: &str) -> Option<u64> {
        self.state.lock().await.views.get(url).copied()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn get(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError> {
        let key = self.keys.article(url);
        let payload = self.state.lock().await.entries.get(&key).cloned();
        payload
            .map(|bytes| codec::decode_record(url, &bytes))
            .transpose()
    }

    async fn set(&self, url: &str, record: &ArticleRecord) -> Result<(), StoreError> {
        let payload = codec::encode_record(record)?;
        let key = self.keys.article(url);
        self.state.lock().await.entries.insert(key, payload);
        Ok(())
    }

    async fn push_recent(&self, url: &str) -> Result<(), StoreError> {
        self.state.lock().await.recent.push_front(url.to_string());
        Ok(())
    }

    async fn increment_score(&self, url: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let score = state.views.entry(url.to_string()).or_insert(0);
        *score += 1;
        Ok(*score)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.recent.iter().take(limit).cloned().collect())
    }

    async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, StoreError> {
        let state = self.state.lock().await;
        let mut ranked: Vec<RankedArticle> = state
            .views
            .iter()
            .map(|(url, views)| RankedArticle {
                url: url.clone(),
                views: *views,
            })
            .collect();
        // Redis orders equal scores lexicographically descending under ZREVRANGE.
        ranked.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| b.url.cmp(&a.url)));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
