use crate::error::ConfigError;
use crate::key::{KeyDeriver, DEFAULT_KEY_SIZE, MAX_KEY_SIZE};
use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

/// Public address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings of the shortening service.
///
/// # Example
///
/// ```rust
/// use shorten_core::ShortenerConfig;
/// use std::time::Duration;
///
/// // Defaults: http://localhost:8080, 8-character keys, no expiration
/// let config = ShortenerConfig::default();
///
/// let config = ShortenerConfig::builder()
///     .base_url("https://sho.rt")
///     .key_size(10)
///     .ttl(Some(Duration::from_secs(86_400)))
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ShortenerConfig {
    /// Address prepended to keys to form short URLs.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,

    /// Length of derived keys.
    #[builder(default = DEFAULT_KEY_SIZE)]
    pub key_size: usize,

    /// Expiration of stored records. `None` keeps them indefinitely.
    #[builder(default)]
    pub ttl: Option<Duration>,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ShortenerConfig {
    /// Checks that derived keys can satisfy `key_size` and that the base URL
    /// is an absolute http(s) address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_size == 0 || self.key_size > MAX_KEY_SIZE {
            return Err(ConfigError::InvalidKeySize {
                key_size: self.key_size,
                max: MAX_KEY_SIZE,
            });
        }

        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason,
        };
        let parsed = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("must not have a query or fragment".to_string()));
        }

        Ok(())
    }

    pub fn key_deriver(&self) -> KeyDeriver {
        KeyDeriver::new(self.key_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShortenerConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.key_size, 8);
        assert_eq!(config.ttl, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = ShortenerConfig::builder()
            .base_url("https://sho.rt/")
            .key_size(12)
            .ttl(Some(Duration::from_secs(60)))
            .build();

        assert!(config.validate().is_ok());
        assert_eq!(config.key_deriver().length(), 12);
    }

    #[test]
    fn rejects_key_size_out_of_range() {
        for key_size in [0, MAX_KEY_SIZE + 1] {
            let config = ShortenerConfig::builder().key_size(key_size).build();
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidKeySize {
                    key_size,
                    max: MAX_KEY_SIZE
                })
            );
        }

        let config = ShortenerConfig::builder().key_size(MAX_KEY_SIZE).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_base_url() {
        for base_url in ["localhost:8080", "ftp://sho.rt", "https://sho.rt/?a=b", ""] {
            let config = ShortenerConfig::builder().base_url(base_url).build();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })),
                "base_url: {base_url:?}"
            );
        }
    }
}
