//! Key layout shared by every store backend.

const ARTICLE_NAMESPACE: &str = "article:";
const RECENCY_KEY: &str = "readability-timequeue";
const VIEW_COUNT_KEY: &str = "readability-viewcount";

/// Builds the namespaced keys for records, the recency list, and the view-count set.
///
/// Records live under `article:{url}`; the two indexes use single fixed keys. An optional
/// prefix is prepended to all three so several deployments can share one Redis.
#[derive(Debug, Clone, Default)]
pub struct StoreKeys {
    prefix: String,
}

impl StoreKeys {
    /// Key layout with `prefix` prepended to every key.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Key holding the serialized record for `url`.
    pub fn article(&self, url: &str) -> String {
        format!("{}{ARTICLE_NAMESPACE}{url}", self.prefix)
    }

    /// Key of the recency list.
    pub fn recency(&self) -> String {
        format!("{}{RECENCY_KEY}", self.prefix)
    }

    /// Key of the view-count sorted set.
    pub fn views(&self) -> String {
        format!("{}{VIEW_COUNT_KEY}", self.prefix)
    }
}
