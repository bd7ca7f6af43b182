//! [`UrlCache`](shorten_core::UrlCache) implementations.

pub mod memory;
pub mod redis;

pub use memory::InMemoryUrlCache;
pub use self::redis::RedisUrlCache;
