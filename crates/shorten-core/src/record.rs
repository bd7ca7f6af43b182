use crate::error::{Result, ShortenError};
use crate::key::ShortKey;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// A shortened URL as stored in the cache and returned to callers.
///
/// Records are immutable once built. The same JSON shape is used as the cache
/// payload and as the HTTP response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The derived short key.
    pub key: ShortKey,
    /// The original URL that was shortened.
    pub long_url: String,
    /// `base_url + "/" + key`, fixed at creation.
    pub short_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Builds a record for `key`, computing the short URL from `base_url`.
    ///
    /// The record is not validated; call [`UrlRecord::validate`] before storing it.
    pub fn new(key: ShortKey, long_url: impl Into<String>, base_url: &str) -> Self {
        let short_url = key.to_url(base_url);
        Self {
            key,
            long_url: long_url.into(),
            short_url,
            created_at: Timestamp::now(),
        }
    }

    /// Checks the record against the configured key size and the URL rules.
    pub fn validate(&self, key_size: usize) -> Result<()> {
        if self.key.is_empty() {
            return Err(ShortenError::EmptyKey);
        }
        if self.key.len() != key_size {
            return Err(ShortenError::InvalidKeySize {
                expected: key_size,
                actual: self.key.len(),
            });
        }
        if self.long_url.is_empty() {
            return Err(ShortenError::EmptyLongUrl);
        }
        validate_long_url(&self.long_url)
    }
}

/// Accepts absolute `http`/`https` URLs with a non-empty host.
///
/// The input is stored and redirected to verbatim, so it is checked as written:
/// whitespace and control characters are rejected rather than stripped, and the
/// scheme must be followed by `://`.
pub fn validate_long_url(long_url: &str) -> Result<()> {
    if long_url
        .chars()
        .any(|c| c.is_ascii_control() || c.is_whitespace())
    {
        return Err(ShortenError::InvalidUrlFormat(format!(
            "{long_url:?} contains whitespace or control characters"
        )));
    }

    let parsed = Url::parse(long_url)
        .map_err(|e| ShortenError::InvalidUrlFormat(format!("'{long_url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ShortenError::InvalidUrlFormat(format!(
            "scheme must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    let has_authority = long_url
        .get(parsed.scheme().len()..)
        .is_some_and(|rest| rest.starts_with("://"));
    if !has_authority {
        return Err(ShortenError::InvalidUrlFormat(format!(
            "'{long_url}' must be of the form scheme://host"
        )));
    }

    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(ShortenError::InvalidUrlFormat(format!(
            "'{long_url}' has no host"
        )));
    }

    Ok(())
}
