use anyhow::Context;
use clap::Parser;
use shorten_cache::{InMemoryUrlCache, RedisUrlCache};
use shorten_core::Shortener;
use shorten_gateway::cli::{CacheBackendArg, Cli};
use shorten_gateway::{App, AppState};
use shorten_service::ShortenerService;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    shorten_telemetry::init(cli.log_format.into()).context("failed to initialize tracing")?;

    let config = cli.shortener_config();
    config.validate().context("invalid shortener configuration")?;

    let shortener: Arc<dyn Shortener> = match cli.cache {
        CacheBackendArg::Redis => {
            let cache = RedisUrlCache::connect(&cli.redis_url)
                .await
                .with_context(|| format!("failed to connect to Redis at {}", cli.redis_url))?;
            info!(redis_url = %cli.redis_url, "Connected to Redis");
            Arc::new(ShortenerService::new(cache, config.clone()))
        }
        CacheBackendArg::InMemory => {
            warn!("Using the in-memory cache, records are lost on shutdown");
            Arc::new(ShortenerService::new(InMemoryUrlCache::new(), config.clone()))
        }
    };

    let app = App::router_with_timeout(AppState::new(shortener), cli.request_timeout());

    let listener = tokio::net::TcpListener::bind(cli.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen_addr))?;
    info!(
        addr = %cli.listen_addr,
        base_url = %config.base_url,
        key_size = config.key_size,
        cache = %cli.cache,
        "Shorten server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shorten server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
