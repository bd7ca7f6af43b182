use crate::error::CacheResult;
use crate::key::ShortKey;
use crate::record::UrlRecord;
use async_trait::async_trait;
use std::time::Duration;

/// A cache for URL records, the sole persistence layer of the shortener.
///
/// Implementations can use Redis, in-memory maps, or other key-value stores.
/// All mutual exclusion and durability guarantees are delegated to them.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, key: &ShortKey) -> CacheResult<Option<UrlRecord>>;

    /// Store URL record in cache, keyed by `record.key`.
    ///
    /// If `ttl` is `None`, the entry never expires.
    async fn set_url(&self, record: &UrlRecord, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove URL record from cache.
    ///
    /// It is not an error if the key does not exist.
    async fn del(&self, key: &ShortKey) -> CacheResult<()>;
}
