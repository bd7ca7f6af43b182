use crate::error::Result;
use crate::key::ShortKey;
use crate::record::UrlRecord;
use async_trait::async_trait;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `long_url`, returning the existing record if the URL was
    /// already shortened.
    async fn shorten(&self, long_url: &str) -> Result<UrlRecord>;

    /// Resolves a key to its stored record.
    /// Fails with `KeyNotFound` if the key is unknown.
    async fn resolve(&self, key: &ShortKey) -> Result<UrlRecord>;

    /// Deletes the record stored under `key`. Deleting an unknown key succeeds.
    async fn delete(&self, key: &ShortKey) -> Result<()>;
}
