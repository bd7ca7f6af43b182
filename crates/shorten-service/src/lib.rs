//! URL shortening service implementation.
//!
//! This crate provides [`ShortenerService`], the cache-backed implementation of
//! [`Shortener`](shorten_core::Shortener). Core types are re-exported from
//! `shorten_core`.

pub mod service;

pub use service::ShortenerService;
pub use shorten_core::{ShortenError, Shortener, ShortenerConfig, UrlRecord};
