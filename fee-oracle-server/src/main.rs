use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fee_oracle::FeeEstimator;
use fee_oracle_server::cache::{CacheClient, MemoryCache, RedisCache};
use fee_oracle_server::cli::Cli;
use fee_oracle_server::config::AppConfig;
use fee_oracle_server::server::{create_app, run_server};
use fee_oracle_server::service::MempoolListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    info!("Starting fee oracle server");
    info!("  upstream feed: {}", config.upstream.url);
    info!(
        "  cache: {}",
        if cli.memory_cache {
            "in-process memory"
        } else {
            config.cache.url.as_str()
        }
    );
    info!(
        "  publish interval: {}ms, cache TTL: {}s",
        config.publisher.publish_interval_ms, config.cache.ttl_secs
    );

    let cache = if cli.memory_cache {
        CacheClient::Memory(MemoryCache::new())
    } else {
        let redis = RedisCache::connect(&config.cache.url)
            .await
            .context("Failed to connect to Redis")?;
        CacheClient::Redis(redis)
    };
    let cache = Arc::new(cache);

    let estimator = FeeEstimator::with_config(
        config.estimator.max_blocks,
        config.estimator.block_vsize_capacity,
    )
    .context("Invalid estimator configuration")?;

    let listener = MempoolListener::new(config.listener_config(), cache.clone(), estimator);
    tokio::spawn(listener.run());

    let app = create_app(cache);
    run_server(app, &config.server.host, config.server.port)
        .await
        .context("Server error")?;

    info!("Fee oracle server shut down");
    Ok(())
}
