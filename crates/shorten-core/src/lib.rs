//! Core types and traits for the Shorten URL shortener.
//!
//! This crate provides the key derivation, the persisted [`UrlRecord`], the
//! [`UrlCache`] capability and the [`Shortener`] contract shared by the
//! service and the HTTP gateway.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod record;
pub mod shortener;

pub use cache::UrlCache;
pub use config::ShortenerConfig;
pub use error::{CacheError, ConfigError, ShortenError};
pub use key::{derive_key, KeyDeriver, ShortKey};
pub use record::UrlRecord;
pub use shortener::Shortener;
