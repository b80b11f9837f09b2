use config::{Config, ConfigError, Environment, File};
use fee_oracle::FeeEstimator;
use serde::Deserialize;
use std::time::Duration;

use crate::cli::Cli;
use crate::service::ListenerConfig;

/// Application configuration.
///
/// Values are layered lowest to highest precedence: built-in defaults, an
/// optional config file, `ORACLE_*` environment variables, then CLI flags
/// via [`AppConfig::apply_cli`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Upstream mempool feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// WebSocket endpoint of the mempool feed
    pub url: String,
    /// Channels requested after connecting
    pub channels: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "wss://mempool.space/api/v1/ws".to_string(),
            channels: vec!["mempool-blocks".to_string(), "transactions".to_string()],
        }
    }
}

/// Cache backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,
    /// Expiry in seconds applied to published keys
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            ttl_secs: 90,
        }
    }
}

/// Publish cadence and decay settings for the ingestion loop.
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    pub publish_interval_ms: u64,
    pub heartbeat_interval_ms: u64,
    pub decay_interval_secs: u64,
    pub decay_factor: f64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            publish_interval_ms: 1500,
            heartbeat_interval_ms: 5000,
            decay_interval_secs: 60,
            decay_factor: 0.995,
        }
    }
}

/// Miner-simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    pub max_blocks: u32,
    pub block_vsize_capacity: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_blocks: FeeEstimator::DEFAULT_MAX_BLOCKS,
            block_vsize_capacity: FeeEstimator::DEFAULT_BLOCK_VSIZE_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, an optional file, and the
    /// environment.
    ///
    /// `config_file` takes precedence over the `ORACLE_CONFIG_FILE`
    /// environment variable; with neither set, `config/default.*` is read
    /// if present. Environment variables use `__` to separate nesting
    /// levels, e.g. `ORACLE_SERVER__PORT=9000`.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("upstream.url", "wss://mempool.space/api/v1/ws")?
            .set_default(
                "upstream.channels",
                vec!["mempool-blocks".to_string(), "transactions".to_string()],
            )?
            .set_default("cache.url", "redis://127.0.0.1:6379")?
            .set_default("cache.ttl_secs", 90)?
            .set_default("publisher.publish_interval_ms", 1500)?
            .set_default("publisher.heartbeat_interval_ms", 5000)?
            .set_default("publisher.decay_interval_secs", 60)?
            .set_default("publisher.decay_factor", 0.995)?
            .set_default("estimator.max_blocks", FeeEstimator::DEFAULT_MAX_BLOCKS as i64)?
            .set_default(
                "estimator.block_vsize_capacity",
                FeeEstimator::DEFAULT_BLOCK_VSIZE_CAPACITY as i64,
            )?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        } else if let Ok(path) = std::env::var("ORACLE_CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&path));
        } else {
            builder = builder.add_source(File::with_name("config/default").required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("ORACLE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(url) = &cli.upstream_url {
            self.upstream.url = url.clone();
        }
        if let Some(url) = &cli.redis_url {
            self.cache.url = url.clone();
        }
        if let Some(ttl) = cli.cache_ttl_secs {
            self.cache.ttl_secs = ttl;
        }
        if let Some(interval) = cli.publish_interval_ms {
            self.publisher.publish_interval_ms = interval;
        }
        if let Some(factor) = cli.decay_factor {
            self.publisher.decay_factor = factor;
        }
    }

    /// Builds the ingestion loop settings from this configuration.
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            url: self.upstream.url.clone(),
            channels: self.upstream.channels.clone(),
            publish_interval: Duration::from_millis(self.publisher.publish_interval_ms),
            heartbeat_interval: Duration::from_millis(self.publisher.heartbeat_interval_ms),
            cache_ttl: Duration::from_secs(self.cache.ttl_secs),
            decay_interval: Duration::from_secs(self.publisher.decay_interval_secs),
            decay_factor: self.publisher.decay_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_config() {
        let config = AppConfig::load(None).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.url, "wss://mempool.space/api/v1/ws");
        assert_eq!(
            config.upstream.channels,
            vec!["mempool-blocks", "transactions"]
        );
        assert_eq!(config.cache.ttl_secs, 90);
        assert_eq!(config.publisher.publish_interval_ms, 1500);
        assert_eq!(config.estimator.max_blocks, FeeEstimator::DEFAULT_MAX_BLOCKS);
        assert_eq!(
            config.estimator.block_vsize_capacity,
            FeeEstimator::DEFAULT_BLOCK_VSIZE_CAPACITY
        );
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        std::env::set_var("ORACLE_SERVER__PORT", "9999");
        std::env::set_var("ORACLE_PUBLISHER__DECAY_FACTOR", "0.5");

        let config = AppConfig::load(None).unwrap();

        std::env::remove_var("ORACLE_SERVER__PORT");
        std::env::remove_var("ORACLE_PUBLISHER__DECAY_FACTOR");

        assert_eq!(config.server.port, 9999);
        assert!((config.publisher.decay_factor - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_listener_config_conversion() {
        let mut config = AppConfig::default();
        config.publisher.publish_interval_ms = 250;
        config.cache.ttl_secs = 10;

        let listener = config.listener_config();

        assert_eq!(listener.publish_interval, Duration::from_millis(250));
        assert_eq!(listener.cache_ttl, Duration::from_secs(10));
        assert_eq!(listener.channels, config.upstream.channels);
    }
}
