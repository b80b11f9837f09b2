use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::CacheError;

/// In-memory stand-in for the Redis cache.
///
/// Honors per-key expiry with lazy eviction on read. Used by tests and by
/// the `--memory-cache` flag when running without a Redis instance.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, expiring after `ttl`.
    pub async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    /// Fetches the value stored at `key`, or None if absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;
        if let Some((value, expires_at)) = entries.get(key) {
            if *expires_at > Instant::now() {
                return Ok(Some(value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }
}
