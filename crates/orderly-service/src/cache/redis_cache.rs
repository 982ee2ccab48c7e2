//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use orderly_config::RedisConfig;
use orderly_core::{OrderlyError, OrderlyResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// `COUNT` hint for each SCAN page during prefix deletes.
const SCAN_BATCH: usize = 100;

/// Redis-based cache service.
///
/// Without a pool every read misses and every write is dropped.
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds the remote tier from configuration.
    ///
    /// An unreachable server is only logged: the cache degrades to misses
    /// until Redis comes back.
    pub async fn connect(config: &RedisConfig) -> OrderlyResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled");
            return Ok(Self::disabled());
        }

        info!("Creating Redis connection pool...");
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| OrderlyError::Cache(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size as usize)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| OrderlyError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        let service = Self::new(Arc::new(pool));
        match service.ping().await {
            Ok(()) => info!("Redis connection pool created successfully"),
            Err(e) => warn!("Redis is unreachable, cache reads will miss: {}", e),
        }

        Ok(service)
    }

    async fn ping(&self) -> OrderlyResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| OrderlyError::Cache(format!("PING failed: {}", e)))?;
        Ok(())
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> OrderlyResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                OrderlyError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(OrderlyError::Cache("Cache is disabled".to_string())),
        }
    }
}

/// Escapes glob metacharacters so `prefix` matches literally in `KEYS`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> OrderlyResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            OrderlyError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> OrderlyResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            OrderlyError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> OrderlyResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            OrderlyError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn delete_prefix(&self, prefix: &str) -> OrderlyResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut conn = self.get_conn().await?;
        let pattern = format!("{}*", escape_glob(prefix));

        // Cursor SCAN; one DEL per non-empty page.
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| OrderlyError::Cache(format!("Failed to scan keys: {}", e)))?;

            if !keys.is_empty() {
                let removed: i64 = conn.del(&keys).await.map_err(|e| {
                    OrderlyError::Cache(format!("Failed to delete keys: {}", e))
                })?;
                deleted += removed.max(0) as u64;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }

    async fn clear(&self) -> OrderlyResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let _: () = deadpool_redis::redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| OrderlyError::Cache(format!("Failed to flush cache: {}", e)))?;

        info!("Flushed Redis cache");
        Ok(())
    }
}
