//! Redis-backed store.
//!
//! Records are JSON strings under `article:{url}`, the recency index is a list fed by
//! `LPUSH`, and view counts live in a sorted set bumped with `ZINCRBY`. All commands go
//! through a [`ConnectionManager`], which reconnects transparently after a dropped link.

use crate::reader::ArticleRecord;
use crate::store::{ArticleStore, RankedArticle, StoreError, StoreKeys, codec};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Cache store talking to a single Redis instance.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    keys: StoreKeys,
    ttl: Option<Duration>,
}

impl RedisStore {
    /// Connect to `redis_url` and verify the server answers `PING`.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let mut connection = client.get_connection_manager().await?;
        let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        tracing::debug!(reply = %pong, "Connected to Redis");

        Ok(Self {
            connection,
            keys: StoreKeys::default(),
            ttl: None,
        })
    }

    /// Use `keys` for every command issued by this store.
    pub fn with_keys(mut self, keys: StoreKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Expire cached records after `ttl`. `None` keeps them indefinitely.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl.filter(|ttl| ttl.as_secs() > 0);
        self
    }
}

/// Inclusive `stop` index for a range of `limit` elements starting at zero.
fn range_stop(limit: usize) -> isize {
    isize::try_from(limit - 1).unwrap_or(isize::MAX)
}

#[async_trait]
impl ArticleStore for RedisStore {
    async fn get(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError> {
        let mut connection = self.connection.clone();
        let payload: Option<Vec<u8>> = connection.get(self.keys.article(url)).await?;
        payload
            .map(|bytes| codec::decode_record(url, &bytes))
            .transpose()
    }

    async fn set(&self, url: &str, record: &ArticleRecord) -> Result<(), StoreError> {
        let payload = codec::encode_record(record)?;
        let key = self.keys.article(url);
        let mut connection = self.connection.clone();
        match self.ttl {
            Some(ttl) => {
                let _: () = connection.set_ex(key, payload, ttl.as_secs()).await?;
            }
            None => {
                let _: () = connection.set(key, payload).await?;
            }
        }
        Ok(())
    }

    async fn push_recent(&self, url: &str) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.lpush(self.keys.recency(), url).await?;
        Ok(())
    }

    async fn increment_score(&self, url: &str) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();
        let score: u64 = connection.zincr(self.keys.views(), url, 1).await?;
        Ok(score)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut connection = self.connection.clone();
        let urls: Vec<String> = connection
            .lrange(self.keys.recency(), 0, range_stop(limit))
            .await?;
        Ok(urls)
    }

    async fn top_viewed(&self, limit: usize) -> Result<Vec<RankedArticle>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut connection = self.connection.clone();
        let ranked: Vec<(String, u64)> = connection
            .zrevrange_withscores(self.keys.views(), 0, range_stop(limit))
            .await?;
        Ok(ranked
            .into_iter()
            .map(|(url, views)| RankedArticle { url, views })
            .collect())
    }
}
