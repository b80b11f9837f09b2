//! Cache layer the ingestion loop publishes into and the API reads from

mod memory_cache;
mod redis_cache;
mod traits;

pub use memory_cache::MemoryCache;
pub use redis_cache::{CacheError, RedisCache};
pub use traits::{CacheClient, FeeCache};

/// Cache key holding the encoded heat-map payload.
pub const HEATMAP_KEY: &str = "heatmap";

/// Prefix of the per-target fee keys ("fee-1", "fee-2", ...).
pub const FEE_KEY_PREFIX: &str = "fee-";

/// Builds the cache key for a confirmation target.
pub fn fee_key(target_blocks: u32) -> String {
    format!("{FEE_KEY_PREFIX}{target_blocks}")
}
