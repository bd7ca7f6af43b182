use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smol_str::SmolStr;
use std::fmt::Display;

/// Default length of a derived key.
pub const DEFAULT_KEY_SIZE: usize = 8;

/// Length of a SHA-256 digest encoded as unpadded URL-safe base64.
pub const MAX_KEY_SIZE: usize = 43;

/// A short key identifying a stored [`UrlRecord`](crate::UrlRecord).
///
/// Keys produced by [`derive_key`] only contain `[A-Za-z0-9_-]`. Keys coming
/// from callers (e.g. a request path) are accepted as-is, since a lookup of a
/// malformed key is simply a miss.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(SmolStr);

impl ShortKey {
    /// Wraps an existing key without validation.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the key in bytes (always ASCII for derived keys).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the public short URL for this key.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }
}

impl std::fmt::Debug for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortKey").field(&self.0).finish()
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShortKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShortKey {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

/// Derives the short key of `long_url`.
///
/// The SHA-256 digest of the URL bytes is encoded as unpadded URL-safe base64
/// and truncated to `length` characters. A `length` above [`MAX_KEY_SIZE`]
/// yields the whole encoded digest.
///
/// Different URLs can share a truncated key. Nothing here detects or resolves
/// such collisions.
pub fn derive_key(long_url: &str, length: usize) -> ShortKey {
    let digest = Sha256::digest(long_url.as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(digest);
    let end = length.min(encoded.len());
    ShortKey::new(&encoded[..end])
}

/// A [`derive_key`] bound to a configured key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDeriver {
    length: usize,
}

impl KeyDeriver {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn derive(&self, long_url: &str) -> ShortKey {
        derive_key(long_url, self.length)
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_SIZE)
    }
}
