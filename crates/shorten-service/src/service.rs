use async_trait::async_trait;
use shorten_core::error::Result;
use shorten_core::{
    KeyDeriver, ShortKey, ShortenError, Shortener, ShortenerConfig, UrlCache, UrlRecord,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `UrlCache` and handles:
/// - Deterministic key derivation
/// - Idempotent re-shortening of known URLs
/// - Record validation before anything is written
///
/// Note: keys are truncated digests, so two URLs can derive the same key.
/// No collision retry is performed; the first stored record wins.
#[derive(Debug, Clone)]
pub struct ShortenerService<C> {
    cache: Arc<C>,
    deriver: KeyDeriver,
    config: ShortenerConfig,
}

impl<C: UrlCache> ShortenerService<C> {
    /// Creates a new `ShortenerService` backed by `cache`.
    pub fn new(cache: C, config: ShortenerConfig) -> Self {
        Self {
            cache: Arc::new(cache),
            deriver: config.key_deriver(),
            config,
        }
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<C: UrlCache> Shortener for ShortenerService<C> {
    async fn shorten(&self, long_url: &str) -> Result<UrlRecord> {
        // An empty string still hashes to a well-formed key
        if long_url.is_empty() {
            return Err(ShortenError::EmptyLongUrl);
        }

        let key = self.deriver.derive(long_url);
        trace!(key = %key, "Derived key");

        if let Some(existing) = self.cache.get_url(&key).await? {
            if existing.long_url != long_url {
                warn!(
                    key = %key,
                    stored_url = %existing.long_url,
                    requested_url = %long_url,
                    "Key collision, returning the stored record"
                );
            } else {
                debug!(key = %key, "URL already shortened");
            }
            return Ok(existing);
        }

        let record = UrlRecord::new(key, long_url, &self.config.base_url);
        record.validate(self.config.key_size)?;

        self.cache.set_url(&record, self.config.ttl).await?;
        debug!(key = %record.key, short_url = %record.short_url, "Stored new record");

        Ok(record)
    }

    async fn resolve(&self, key: &ShortKey) -> Result<UrlRecord> {
        self.cache
            .get_url(key)
            .await?
            .ok_or_else(|| ShortenError::KeyNotFound(key.to_string()))
    }

    async fn delete(&self, key: &ShortKey) -> Result<()> {
        self.cache.del(key).await?;
        debug!(key = %key, "Deleted record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorten_cache::InMemoryUrlCache;
    use shorten_core::error::CacheResult;
    use shorten_core::CacheError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Wraps the in-memory cache and counts writes.
    #[derive(Default)]
    struct CountingCache {
        inner: InMemoryUrlCache,
        sets: AtomicUsize,
        last_ttl: std::sync::Mutex<Option<Duration>>,
    }

    impl CountingCache {
        fn sets(&self) -> usize {
            self.sets.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UrlCache for CountingCache {
        async fn get_url(&self, key: &ShortKey) -> CacheResult<Option<UrlRecord>> {
            self.inner.get_url(key).await
        }

        async fn set_url(&self, record: &UrlRecord, ttl: Option<Duration>) -> CacheResult<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            *self.last_ttl.lock().unwrap() = ttl;
            self.inner.set_url(record, ttl).await
        }

        async fn del(&self, key: &ShortKey) -> CacheResult<()> {
            self.inner.del(key).await
        }
    }

    /// Every operation fails as if the backend were down.
    #[derive(Default)]
    struct UnavailableCache {
        sets: AtomicUsize,
    }

    #[async_trait]
    impl UrlCache for UnavailableCache {
        async fn get_url(&self, _key: &ShortKey) -> CacheResult<Option<UrlRecord>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set_url(&self, _record: &UrlRecord, _ttl: Option<Duration>) -> CacheResult<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn del(&self, _key: &ShortKey) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    fn test_service() -> ShortenerService<CountingCache> {
        ShortenerService::new(CountingCache::default(), ShortenerConfig::default())
    }

    #[tokio::test]
    async fn shorten_returns_valid_record() {
        let service = test_service();

        let record = service.shorten("https://github.com/d4niells").await.unwrap();

        assert_eq!(record.key.as_str(), "tw8MO9xO");
        assert_eq!(record.long_url, "https://github.com/d4niells");
        assert_eq!(record.short_url, "http://localhost:8080/tw8MO9xO");
        assert_eq!(service.cache().sets(), 1);
    }

    #[tokio::test]
    async fn shorten_key_shape() {
        let service = test_service();

        for url in [
            "https://example.com",
            "http://example.com/a/b?c=d",
            "https://sub.example.org:8443/#frag",
        ] {
            let record = service.shorten(url).await.unwrap();
            assert_eq!(record.key.len(), 8);
            assert!(record.short_url.ends_with(&format!("/{}", record.key)));
        }
    }

    #[tokio::test]
    async fn shorten_is_idempotent() {
        let service = test_service();

        let first = service.shorten("https://example.com").await.unwrap();
        let second = service.shorten("https://example.com").await.unwrap();

        assert_eq!(first.key, second.key);
        assert_eq!(first.short_url, second.short_url);
        // the stored record is returned unchanged
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(service.cache().sets(), 1);
    }

    #[tokio::test]
    async fn shorten_empty_url_fails_without_write() {
        let service = test_service();

        let err = service.shorten("").await.unwrap_err();

        assert!(matches!(err, ShortenError::EmptyLongUrl));
        assert_eq!(service.cache().sets(), 0);
        assert!(service.cache().inner.is_empty());
    }

    #[tokio::test]
    async fn shorten_invalid_urls_fail_without_write() {
        let service = test_service();

        for url in [
            "ftp://example.com",
            "not-a-url",
            "x:///github.com",
            "://example.com",
            "https://exa\nmple.com",
            "https://example.com/\t",
            "http:example.com",
            "https:/example.com",
        ] {
            let err = service.shorten(url).await.unwrap_err();
            assert!(
                matches!(err, ShortenError::InvalidUrlFormat(_)),
                "url: {url:?}, err: {err:?}"
            );
        }

        assert_eq!(service.cache().sets(), 0);
    }

    #[tokio::test]
    async fn shorten_hit_returns_stored_record_on_collision() {
        let service = test_service();

        // Plant a record under the key "https://example.com" derives to
        let key = shorten_core::derive_key("https://example.com", 8);
        let planted = UrlRecord::new(key, "https://other.example", "http://localhost:8080");
        service.cache().inner.set_url(&planted, None).await.unwrap();

        let record = service.shorten("https://example.com").await.unwrap();

        assert_eq!(record, planted);
        assert_eq!(service.cache().sets(), 0);
    }

    #[tokio::test]
    async fn shorten_uses_configured_ttl() {
        let config = ShortenerConfig::builder()
            .ttl(Some(Duration::from_secs(60)))
            .build();
        let service = ShortenerService::new(CountingCache::default(), config);

        service.shorten("https://example.com").await.unwrap();

        assert_eq!(
            *service.cache().last_ttl.lock().unwrap(),
            Some(Duration::from_secs(60))
        );
    }

    #[tokio::test]
    async fn shorten_uses_configured_base_url_and_key_size() {
        let config = ShortenerConfig::builder()
            .base_url("https://sho.rt/")
            .key_size(6)
            .build();
        let service = ShortenerService::new(CountingCache::default(), config);

        let record = service.shorten("https://example.com").await.unwrap();

        assert_eq!(record.key.as_str(), "EAaArV");
        assert_eq!(record.short_url, "https://sho.rt/EAaArV");
    }

    #[tokio::test]
    async fn shorten_with_unreachable_key_size_fails_validation() {
        let config = ShortenerConfig::builder().key_size(64).build();
        let service = ShortenerService::new(CountingCache::default(), config);

        let err = service.shorten("https://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            ShortenError::InvalidKeySize {
                expected: 64,
                actual: 43
            }
        ));
        assert_eq!(service.cache().sets(), 0);
    }

    #[tokio::test]
    async fn shorten_propagates_cache_errors() {
        let service = ShortenerService::new(UnavailableCache::default(), ShortenerConfig::default());

        let err = service.shorten("https://example.com").await.unwrap_err();

        assert!(matches!(err, ShortenError::Cache(CacheError::Unavailable(_))));
        assert_eq!(service.cache().sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolve_round_trip() {
        let service = test_service();

        let created = service.shorten("https://example.com").await.unwrap();
        let resolved = service.resolve(&created.key).await.unwrap();

        assert_eq!(resolved.long_url, "https://example.com");
        assert_eq!(resolved, created);
    }

    #[tokio::test]
    async fn resolve_nonexistent_key() {
        let service = test_service();

        let err = service
            .resolve(&ShortKey::new("nonexistent-key"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenError::KeyNotFound(key) if key == "nonexistent-key"));
    }

    #[tokio::test]
    async fn resolve_does_not_write() {
        let service = test_service();

        let _ = service.resolve(&ShortKey::new("EAaArVRs")).await;

        assert_eq!(service.cache().sets(), 0);
        assert!(service.cache().inner.is_empty());
    }

    #[tokio::test]
    async fn resolve_propagates_cache_errors() {
        let service = ShortenerService::new(UnavailableCache::default(), ShortenerConfig::default());

        let err = service
            .resolve(&ShortKey::new("EAaArVRs"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenError::Cache(_)));
    }

    #[tokio::test]
    async fn delete_existing_record() {
        let service = test_service();

        let created = service.shorten("https://example.com").await.unwrap();
        service.delete(&created.key).await.unwrap();

        let err = service.resolve(&created.key).await.unwrap_err();
        assert!(matches!(err, ShortenError::KeyNotFound(_)));
    }

    #[tokio::test]
    async fn delete_nonexistent_record() {
        let service = test_service();

        service.delete(&ShortKey::new("nonexistent")).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_shorten_same_url() {
        let service = Arc::new(test_service());
        let mut handles = vec![];

        for _ in 0..10 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.shorten("https://example.com").await.unwrap()
            }));
        }

        for handle in handles {
            let record = handle.await.unwrap();
            assert_eq!(record.key.as_str(), "EAaArVRs");
            assert_eq!(record.long_url, "https://example.com");
        }

        // racing writers store identical records under one key
        assert_eq!(service.cache().inner.len(), 1);
    }
}
