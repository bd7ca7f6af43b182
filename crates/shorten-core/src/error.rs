use thiserror::Error;

/// Result type for the shortening and resolution operations.
pub type Result<T> = std::result::Result<T, ShortenError>;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors returned by a [`Shortener`](crate::Shortener).
///
/// The first four variants are caller-input faults. `KeyNotFound` is a normal
/// lookup miss. `Cache` carries infrastructure failures unchanged.
#[derive(Debug, Clone, Error)]
pub enum ShortenError {
    #[error("long url cannot be empty")]
    EmptyLongUrl,
    #[error("key cannot be empty")]
    EmptyKey,
    #[error("key must be {expected} characters long, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },
    #[error("invalid URL format: {0}")]
    InvalidUrlFormat(String),
    #[error("key does not exist: {0}")]
    KeyNotFound(String),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ShortenError {
    /// Returns `true` for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShortenError::EmptyLongUrl
                | ShortenError::EmptyKey
                | ShortenError::InvalidKeySize { .. }
                | ShortenError::InvalidUrlFormat(_)
        )
    }
}

/// Errors raised while validating a [`ShortenerConfig`](crate::ShortenerConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid key size {key_size}; expected 1..={max}")]
    InvalidKeySize { key_size: usize, max: usize },
    #[error("invalid base url '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
