use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Cache operation errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Redis-backed cache for published estimates and heat-maps.
///
/// All values are stored as strings with a per-key TTL, so consumers other
/// than this server (dashboards, the reference frontend) can read them
/// without any shared schema beyond the key names.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis at the given URL.
    ///
    /// The connection manager multiplexes commands over one connection and
    /// re-establishes it after transient failures, so callers never hold a
    /// broken handle.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        debug!("Established Redis connection to {url}");
        Ok(Self { manager })
    }

    /// Stores `value` under `key`, expiring after `ttl`.
    pub async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    /// Fetches the value stored at `key`, or None if absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}
