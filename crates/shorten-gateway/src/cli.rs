use clap::{Parser, ValueEnum};
use shorten_core::config::DEFAULT_BASE_URL;
use shorten_core::key::DEFAULT_KEY_SIZE;
use shorten_core::ShortenerConfig;
use shorten_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SHORTEN_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "SHORTEN_BASE_URL";
pub const KEY_SIZE_ENV: &str = "SHORTEN_KEY_SIZE";
pub const CACHE_TTL_ENV: &str = "SHORTEN_CACHE_TTL_SECS";
pub const CACHE_BACKEND_ENV: &str = "SHORTEN_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "SHORTEN_REDIS_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "SHORTEN_REQUEST_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "SHORTEN_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "redis")]
    Redis,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::Redis => write!(f, "redis"),
            CacheBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        LogFormat::from(*self).fmt(f)
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shorten", about = "URL shortener HTTP server")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Address prepended to keys to build short URLs.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = KEY_SIZE_ENV, default_value_t = DEFAULT_KEY_SIZE)]
    pub key_size: usize,

    /// Expiration of stored records in seconds; 0 keeps them forever.
    #[arg(long, env = CACHE_TTL_ENV, default_value_t = 0)]
    pub cache_ttl_secs: u64,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::Redis
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,
}

impl Cli {
    pub fn shortener_config(&self) -> ShortenerConfig {
        let ttl = (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs));

        ShortenerConfig::builder()
            .base_url(self.base_url.clone())
            .key_size(self.key_size)
            .ttl(ttl)
            .build()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
