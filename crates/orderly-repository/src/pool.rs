//! Database connection pool management.

use async_trait::async_trait;
use orderly_config::DatabaseConfig;
use orderly_core::{HealthCheck, HealthStatus, Interface, OrderlyError, OrderlyResult};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Interface for database pool operations.
///
/// This trait abstracts database pool functionality for dependency injection.
#[async_trait]
pub trait DatabasePoolInterface: Interface {
    /// Returns a reference to the underlying PostgreSQL pool.
    fn inner(&self) -> &PgPool;

    /// Acquires a connection scoped to one store operation.
    ///
    /// The connection goes back to the pool when the guard is dropped.
    async fn acquire(&self) -> OrderlyResult<PoolConnection<Postgres>> {
        debug!("Acquiring database connection");
        self.inner().acquire().await.map_err(|e| {
            warn!("Failed to acquire database connection: {}", e);
            OrderlyError::Store(format!("Failed to acquire connection: {}", e))
        })
    }

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> OrderlyResult<()>;

    /// Runs database migrations.
    async fn run_migrations(&self) -> OrderlyResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component, Clone)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> OrderlyResult<Self> {
        info!("Connecting to PostgreSQL database {} on {}...", config.name, config.host);

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.connection_url())
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                OrderlyError::Store(format!("Failed to connect: {}", e))
            })?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Creates a `DatabasePool` around a pre-existing pool.
    #[must_use]
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Wraps the pool for injection behind its interface.
    #[must_use]
    pub fn into_shared(self) -> Arc<dyn DatabasePoolInterface> {
        Arc::new(self)
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check(&self) -> OrderlyResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OrderlyError::Store(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn run_migrations(&self) -> OrderlyResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| OrderlyError::Store(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

/// Readiness check over any database pool.
pub struct DatabaseHealth {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl DatabaseHealth {
    /// Creates a check for `pool`.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealth {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.pool.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}
