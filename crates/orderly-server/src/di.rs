//! Dependency injection module using Shaku.
//!
//! `AppModule` wires the pool, the tiered cache, one repository per
//! resource and one entity service per resource.

use orderly_config::RedisConfig;
use orderly_core::{History, Order, OrderlyResult, User};
use orderly_repository::{
    DatabaseHealth, DatabasePool, DatabasePoolInterface, DatabasePoolParameters,
    PgHistoryRepository, PgOrderRepository, PgUserRepository,
};
use orderly_rest::AppState;
use orderly_service::{
    CacheInterface, EntityService, EntityServiceImplParameters, HistoryServiceComponent,
    LocalCache, OrderServiceComponent, RedisCacheService, TieredCache, TieredCacheParameters,
    UserServiceComponent,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

// Single-process deployment:
// - Database pool and the three repositories
// - Two-tier cache (moka in front of Redis)
// - Entity services for users, orders and histories
module! {
    pub AppModule {
        components = [
            DatabasePool,
            TieredCache,
            PgUserRepository,
            PgOrderRepository,
            PgHistoryRepository,
            UserServiceComponent,
            OrderServiceComponent,
            HistoryServiceComponent,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Builds the cache tiers described by `config`.
///
/// With Redis disabled the remote tier always misses and only the local
/// tier serves hits.
pub async fn build_cache_parameters(config: &RedisConfig) -> OrderlyResult<TieredCacheParameters> {
    let remote = RedisCacheService::connect(config).await?;
    let local = LocalCache::from_config(config);

    info!(
        "Cache tiers ready: local capacity {} ({}s), remote {}",
        config.local_capacity,
        config.local_ttl_secs,
        if remote.is_enabled() { "enabled" } else { "disabled" }
    );

    Ok(TieredCacheParameters {
        local: Arc::new(local),
        remote: Arc::new(remote),
        local_ttl: config.local_ttl(),
    })
}

/// Wires an [`AppModule`] around an open pool and prepared cache tiers.
///
/// `cache_ttl` applies to every cached entity and listing.
#[must_use]
pub fn assemble_app_module(
    db_pool: &DatabasePool,
    cache: TieredCacheParameters,
    cache_ttl: Duration,
) -> AppModule {
    AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<TieredCache>(cache)
        .with_component_parameters::<UserServiceComponent>(EntityServiceImplParameters {
            ttl: cache_ttl,
            ..Default::default()
        })
        .with_component_parameters::<OrderServiceComponent>(EntityServiceImplParameters {
            ttl: cache_ttl,
            ..Default::default()
        })
        .with_component_parameters::<HistoryServiceComponent>(EntityServiceImplParameters {
            ttl: cache_ttl,
            ..Default::default()
        })
        .build()
}

/// Builds the application module with all dependencies.
pub async fn build_app_module(
    db_pool: &DatabasePool,
    redis_config: &RedisConfig,
) -> OrderlyResult<Arc<AppModule>> {
    let cache = build_cache_parameters(redis_config).await?;
    let module = assemble_app_module(db_pool, cache, redis_config.ttl());

    info!("Application module wired");
    Ok(Arc::new(module))
}

impl AppModule {
    /// Builds the REST state from the module's services.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.user_service(),
            self.order_service(),
            self.history_service(),
        )
        .with_health_check(Arc::new(DatabaseHealth::new(self.database_pool())))
    }
}

// ============================================================================
// Module Resolution Helpers
// ============================================================================

/// Resolves the entity services.
pub trait ServiceResolver {
    /// Resolves the user service.
    fn user_service(&self) -> Arc<dyn EntityService<User>>;

    /// Resolves the order service.
    fn order_service(&self) -> Arc<dyn EntityService<Order>>;

    /// Resolves the history service.
    fn history_service(&self) -> Arc<dyn EntityService<History>>;
}

impl ServiceResolver for AppModule {
    fn user_service(&self) -> Arc<dyn EntityService<User>> {
        self.resolve()
    }

    fn order_service(&self) -> Arc<dyn EntityService<Order>> {
        self.resolve()
    }

    fn history_service(&self) -> Arc<dyn EntityService<History>> {
        self.resolve()
    }
}

/// Resolves the database pool.
pub trait DatabaseResolver {
    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for AppModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Resolves the cache.
pub trait CacheResolver {
    /// Resolves the cache interface.
    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl CacheResolver for AppModule {
    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
