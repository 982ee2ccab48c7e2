//! Two-tier cache: a local shadow in front of the remote store.

use super::CacheInterface;
use async_trait::async_trait;
use orderly_core::OrderlyResult;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Reads the local tier first and falls back to the remote tier,
/// back-filling the local tier on a remote hit.
///
/// Writes and deletes reach both tiers. The local tier is always updated
/// even when the remote call fails; the remote error is then returned.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct TieredCache {
    local: Arc<dyn CacheInterface>,
    remote: Arc<dyn CacheInterface>,
    local_ttl: Duration,
}

impl TieredCache {
    /// Creates a tiered cache.
    #[must_use]
    pub fn new(
        local: Arc<dyn CacheInterface>,
        remote: Arc<dyn CacheInterface>,
        local_ttl: Duration,
    ) -> Self {
        Self {
            local,
            remote,
            local_ttl,
        }
    }
}

#[async_trait]
impl CacheInterface for TieredCache {
    fn is_enabled(&self) -> bool {
        self.local.is_enabled() || self.remote.is_enabled()
    }

    async fn get_raw(&self, key: &str) -> OrderlyResult<Option<String>> {
        if let Some(value) = self.local.get_raw(key).await? {
            return Ok(Some(value));
        }

        let value = self.remote.get_raw(key).await?;
        if let Some(value) = &value {
            debug!("Back-filling local tier for key '{}'", key);
            self.local.set_raw(key, value, self.local_ttl).await?;
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> OrderlyResult<()> {
        self.local.set_raw(key, value, ttl.min(self.local_ttl)).await?;
        self.remote.set_raw(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> OrderlyResult<bool> {
        let local = self.local.delete(key).await?;
        let remote = self.remote.delete(key).await?;
        Ok(local || remote)
    }

    async fn delete_prefix(&self, prefix: &str) -> OrderlyResult<u64> {
        let local = self.local.delete_prefix(prefix).await?;
        let remote = self.remote.delete_prefix(prefix).await?;
        Ok(local.max(remote))
    }

    async fn clear(&self) -> OrderlyResult<()> {
        self.local.clear().await?;
        self.remote.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LocalCache, RedisCacheService};
    use orderly_core::OrderlyError;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Remote tier that can be switched to fail every call.
    struct FlakyRemote {
        inner: LocalCache,
        down: AtomicBool,
    }

    impl FlakyRemote {
        fn new() -> Self {
            Self {
                inner: LocalCache::new(100, Duration::from_secs(60)),
                down: AtomicBool::new(false),
            }
        }

        fn check(&self) -> OrderlyResult<()> {
            if self.down.load(Ordering::SeqCst) {
                Err(OrderlyError::Cache("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CacheInterface for FlakyRemote {
        fn is_enabled(&self) -> bool {
            true
        }
        async fn get_raw(&self, key: &str) -> OrderlyResult<Option<String>> {
            self.check()?;
            self.inner.get_raw(key).await
        }
        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> OrderlyResult<()> {
            self.check()?;
            self.inner.set_raw(key, value, ttl).await
        }
        async fn delete(&self, key: &str) -> OrderlyResult<bool> {
            self.check()?;
            self.inner.delete(key).await
        }
        async fn delete_prefix(&self, prefix: &str) -> OrderlyResult<u64> {
            self.check()?;
            self.inner.delete_prefix(prefix).await
        }
        async fn clear(&self) -> OrderlyResult<()> {
            self.check()?;
            self.inner.clear().await
        }
    }

    fn tiers() -> (Arc<LocalCache>, Arc<FlakyRemote>, TieredCache) {
        let local = Arc::new(LocalCache::new(100, Duration::from_secs(60)));
        let remote = Arc::new(FlakyRemote::new());
        let tiered = TieredCache::new(local.clone(), remote.clone(), Duration::from_secs(60));
        (local, remote, tiered)
    }

    #[tokio::test]
    async fn test_remote_hit_backfills_local() {
        let (local, remote, tiered) = tiers();
        remote.set_raw("user:1", "{}", Duration::from_secs(60)).await.unwrap();

        assert_eq!(tiered.get_raw("user:1").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(local.get_raw("user:1").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_local_hit_skips_remote() {
        let (local, remote, tiered) = tiers();
        local.set_raw("user:1", "{}", Duration::from_secs(60)).await.unwrap();
        remote.down.store(true, Ordering::SeqCst);

        assert!(tiered.get_raw("user:1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_reaches_both_tiers() {
        let (local, remote, tiered) = tiers();
        tiered.set_raw("order:1", "{}", Duration::from_secs(60)).await.unwrap();
        tiered.set_raw("orders:take=1:skip=0", "[]", Duration::from_secs(60)).await.unwrap();

        assert!(tiered.delete("order:1").await.unwrap());
        assert_eq!(tiered.delete_prefix("orders:").await.unwrap(), 1);

        for key in ["order:1", "orders:take=1:skip=0"] {
            assert!(local.get_raw(key).await.unwrap().is_none());
            assert!(remote.get_raw(key).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_remote_failure_still_updates_local() {
        let (local, remote, tiered) = tiers();
        tiered.set_raw("user:1", "{}", Duration::from_secs(60)).await.unwrap();
        remote.down.store(true, Ordering::SeqCst);

        assert!(tiered.delete("user:1").await.is_err());
        assert!(local.get_raw("user:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_remote_serves_from_local() {
        let local = Arc::new(LocalCache::new(100, Duration::from_secs(60)));
        let tiered = TieredCache::new(
            local,
            Arc::new(RedisCacheService::disabled()),
            Duration::from_secs(60),
        );

        tiered.set_raw("history:1", "{}", Duration::from_secs(60)).await.unwrap();
        assert!(tiered.is_enabled());
        assert!(tiered.get_raw("history:1").await.unwrap().is_some());
    }
}
