//! Common test utilities for integration tests.
//!
//! Provides testcontainers-based PostgreSQL setup for repository testing.

use orderly_config::DatabaseConfig;
use orderly_repository::{DatabasePool, DatabasePoolInterface};
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Test database container wrapper.
///
/// Manages a PostgreSQL testcontainer lifecycle and provides a database pool.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pool: Arc<dyn DatabasePoolInterface>,
}

impl TestDatabase {
    /// Creates a new test database with a fresh PostgreSQL container.
    ///
    /// Runs migrations automatically after container startup.
    pub async fn new() -> Self {
        let container = Postgres::default()
            .with_env_var("POSTGRES_USER", "orderly")
            .with_env_var("POSTGRES_PASSWORD", "orderly")
            .with_env_var("POSTGRES_DB", "orderly_test")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get PostgreSQL port");

        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            user: "orderly".to_string(),
            password: "orderly".to_string(),
            name: "orderly_test".to_string(),
            min_connections: 1,
            max_connections: 5,
            ..DatabaseConfig::default()
        };

        let pool = Self::connect_with_retry(&config, 30).await;

        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            _container: container,
            pool: pool.into_shared(),
        }
    }

    /// Returns the database pool.
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        Arc::clone(&self.pool)
    }

    /// Connects to the database with retry logic.
    async fn connect_with_retry(config: &DatabaseConfig, max_attempts: u32) -> DatabasePool {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match DatabasePool::connect(config).await {
                Ok(pool) => return pool,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!("Failed to connect to database after {} attempts: {}", max_attempts, e);
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}
