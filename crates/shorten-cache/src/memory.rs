use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use shorten_core::error::CacheResult;
use shorten_core::{CacheError, ShortKey, UrlCache, UrlRecord};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Entry {
    record: UrlRecord,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expire_at
            .is_some_and(|expire_at| Timestamp::now() >= expire_at)
    }
}

/// In-memory implementation of [`UrlCache`] using DashMap.
///
/// DashMap shards its locks, so reads and writes to different keys do not
/// block each other. Expired entries are dropped lazily on access.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUrlCache {
    storage: DashMap<String, Entry>,
}

impl InMemoryUrlCache {
    /// Creates a new in-memory cache.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory cache with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Removes the entry under `key` only if it is still expired, so a record
    /// written after the expiry was observed survives.
    fn evict_if_expired(&self, key: &str) -> bool {
        self.storage
            .remove_if(key, |_, entry| entry.is_expired())
            .is_some()
    }
}

fn expire_at(ttl: Option<Duration>) -> CacheResult<Option<Timestamp>> {
    let Some(ttl) = ttl else {
        return Ok(None);
    };

    let ttl = SignedDuration::try_from(ttl)
        .map_err(|e| CacheError::InvalidData(format!("invalid ttl {ttl:?}: {e}")))?;
    let expire_at = Timestamp::now()
        .checked_add(ttl)
        .map_err(|e| CacheError::InvalidData(format!("invalid ttl {ttl}: {e}")))?;

    Ok(Some(expire_at))
}

#[async_trait]
impl UrlCache for InMemoryUrlCache {
    async fn get_url(&self, key: &ShortKey) -> CacheResult<Option<UrlRecord>> {
        trace!(key = %key, "Fetching URL record from memory");

        let Some(entry) = self.storage.get(key.as_str()) else {
            trace!(key = %key, "Cache miss in memory");
            return Ok(None);
        };

        if entry.is_expired() {
            drop(entry);
            if self.evict_if_expired(key.as_str()) {
                debug!(key = %key, "Evicted expired record");
            }
            return Ok(None);
        }

        debug!(key = %key, "Cache hit in memory");
        Ok(Some(entry.record.clone()))
    }

    async fn set_url(&self, record: &UrlRecord, ttl: Option<Duration>) -> CacheResult<()> {
        trace!(key = %record.key, "Storing URL record in memory");

        let entry = Entry {
            record: record.clone(),
            expire_at: expire_at(ttl)?,
        };
        self.storage.insert(record.key.as_str().to_owned(), entry);

        debug!(key = %record.key, ttl = ?ttl, "Cached record in memory");
        Ok(())
    }

    async fn del(&self, key: &ShortKey) -> CacheResult<()> {
        trace!(key = %key, "Removing URL record from memory");

        self.storage.remove(key.as_str());
        debug!(key = %key, "Removed record from memory (if present)");
        Ok(())
    }
}
