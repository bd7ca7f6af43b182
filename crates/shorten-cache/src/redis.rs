use async_trait::async_trait;
use redis::AsyncCommands;
use shorten_core::error::CacheResult;
use shorten_core::{CacheError, ShortKey, UrlCache, UrlRecord};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Key prefix used by [`RedisUrlCache::new`].
pub const DEFAULT_KEY_PREFIX: &str = "shorten:url:";

/// A Redis-based implementation of [`UrlCache`].
///
/// Records are stored as JSON strings under a configurable key prefix.
/// Records stored without a TTL never expire.
#[derive(Debug, Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    /// Creates a new Redis URL cache.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a new Redis URL cache with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for cache keys (e.g., "myapp:url:")
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a connection to `redis_url` and checks it with a `PING`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use shorten_cache::RedisUrlCache;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let cache = RedisUrlCache::connect("redis://127.0.0.1:6379").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            CacheError::Initialization(format!("invalid redis url '{redis_url}': {e}"))
        })?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;

        let cache = Self::new(conn);
        cache.ping().await?;
        Ok(cache)
    }

    /// Round-trips a `PING` to check the connection.
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to ping Redis", e))?;
        Ok(())
    }

    /// Generates the Redis key for a short key.
    fn cache_key(&self, key: &ShortKey) -> String {
        format!("{}{}", self.key_prefix, key.as_str())
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, key: &ShortKey) -> CacheResult<Option<UrlRecord>> {
        let redis_key = self.cache_key(key);
        trace!(key = %key, "Fetching URL record from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(Some(cached)) => {
                debug!(key = %key, "Cache hit in Redis");
                match serde_json::from_str::<UrlRecord>(&cached) {
                    Ok(record) => Ok(Some(record)),
                    Err(e) => {
                        warn!(key = %key, error = %e, "Failed to deserialize cached record");
                        Err(CacheError::InvalidData(format!(
                            "invalid cached value for key '{redis_key}': {e}"
                        )))
                    }
                }
            }
            Ok(None) => {
                trace!(key = %key, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set_url(&self, record: &UrlRecord, ttl: Option<Duration>) -> CacheResult<()> {
        let redis_key = self.cache_key(&record.key);
        trace!(key = %record.key, "Storing URL record in Redis cache");

        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %record.key, error = %e, "Failed to serialize record for caching");
                return Err(CacheError::Serialization(format!(
                    "failed to serialize cache value: {e}"
                )));
            }
        };

        let mut conn = self.conn.clone();
        let result = match ttl {
            // PX rejects zero, so sub-millisecond TTLs round up
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                conn.pset_ex::<_, _, ()>(&redis_key, json, millis).await
            }
            None => conn.set::<_, _, ()>(&redis_key, json).await,
        };

        match result {
            Ok(()) => {
                debug!(key = %record.key, ttl = ?ttl, "Cached record in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key = %record.key, error = %e, "Failed to cache record in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn del(&self, key: &ShortKey) -> CacheResult<()> {
        let redis_key = self.cache_key(key);
        trace!(key = %key, "Removing URL record from Redis cache");

        let mut conn = self.conn.clone();
        match conn.del::<_, ()>(&redis_key).await {
            Ok(()) => {
                debug!(key = %key, "Removed record from Redis cache");
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to remove record from Redis cache");
                Err(map_redis_error("failed to delete value from Redis", e))
            }
        }
    }
}
