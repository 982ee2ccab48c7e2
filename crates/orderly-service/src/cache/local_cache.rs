//! In-process cache tier backed by `moka`.

use super::CacheInterface;
use async_trait::async_trait;
use moka::future::Cache;
use orderly_config::RedisConfig;
use orderly_core::OrderlyResult;
use std::time::Duration;
use tracing::debug;

/// Bounded, time-limited shadow of the remote cache.
///
/// Entries expire after the tier's own TTL regardless of the TTL passed to
/// `set_raw`.
#[derive(Clone)]
pub struct LocalCache {
    cache: Cache<String, String>,
}

impl LocalCache {
    /// Creates a local cache holding at most `capacity` entries for `ttl`.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Creates a local cache from the `local_*` settings.
    #[must_use]
    pub fn from_config(config: &RedisConfig) -> Self {
        Self::new(config.local_capacity, config.local_ttl())
    }
}

#[async_trait]
impl CacheInterface for LocalCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> OrderlyResult<Option<String>> {
        let value = self.cache.get(key).await;
        if value.is_some() {
            debug!("Local cache hit for key '{}'", key);
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> OrderlyResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> OrderlyResult<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_prefix(&self, prefix: &str) -> OrderlyResult<u64> {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in &keys {
            self.cache.invalidate(key).await;
        }

        Ok(keys.len() as u64)
    }

    async fn clear(&self) -> OrderlyResult<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}
