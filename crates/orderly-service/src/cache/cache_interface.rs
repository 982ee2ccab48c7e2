//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use orderly_core::{Interface, OrderlyResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache interface for storing and retrieving cached data.
///
/// Values are stored as JSON strings so the trait stays dyn-compatible.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> OrderlyResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> OrderlyResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> OrderlyResult<bool>;

    /// Delete every key starting with `prefix`.
    ///
    /// Returns the number of keys deleted.
    async fn delete_prefix(&self, prefix: &str) -> OrderlyResult<u64>;

    /// Drop every entry.
    async fn clear(&self) -> OrderlyResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed and failure-tolerant helpers.
///
/// `get_or_populate` and `invalidate` never surface cache errors: they are
/// logged and the access is treated as a miss.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> OrderlyResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> OrderlyResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its result.
    ///
    /// Loader errors are returned as-is and nothing is cached. When the
    /// lookup itself fails the loaded value is served without being stored.
    /// An entry that no longer decodes is overwritten with the loaded value.
    async fn get_or_populate<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> OrderlyResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = OrderlyResult<T>> + Send,
    {
        let cache_healthy = match self.get_raw(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(cached) => {
                    debug!("Serving '{}' from cache", key);
                    return Ok(cached);
                }
                Err(e) => {
                    warn!("Replacing undecodable cache entry '{}': {}", key, e);
                    true
                }
            },
            Ok(None) => true,
            Err(e) => {
                warn!("Cache read for '{}' failed, falling back to store: {}", key, e);
                false
            }
        };

        let value = loader().await?;

        if cache_healthy {
            if let Err(e) = self.set(key, &value, ttl).await {
                warn!("Failed to cache '{}': {}", key, e);
            }
        }

        Ok(value)
    }

    /// Removes `keys` and every key under `prefixes`, logging failures.
    async fn invalidate(&self, keys: &[String], prefixes: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                warn!("Failed to invalidate '{}': {}", key, e);
            }
        }
        for prefix in prefixes {
            if let Err(e) = self.delete_prefix(prefix).await {
                warn!("Failed to invalidate prefix '{}': {}", prefix, e);
            }
        }
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
