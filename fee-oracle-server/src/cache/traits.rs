use async_trait::async_trait;
use std::time::Duration;

use super::CacheError;

/// Trait for the cache operations the oracle needs
#[async_trait]
pub trait FeeCache: Send + Sync {
    /// Store `value` under `key` with an expiry
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Fetch the value at `key`, or None if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
}

/// Wrapper enum for the Redis-backed or in-memory cache
pub enum CacheClient {
    Redis(super::RedisCache),
    Memory(super::MemoryCache),
}

#[async_trait]
impl FeeCache for CacheClient {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        match self {
            CacheClient::Redis(cache) => cache.set_with_ttl(key, value, ttl).await,
            CacheClient::Memory(cache) => cache.set_with_ttl(key, value, ttl).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            CacheClient::Redis(cache) => cache.get(key).await,
            CacheClient::Memory(cache) => cache.get(key).await,
        }
    }
}
