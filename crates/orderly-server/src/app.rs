//! Application lifecycle.

use crate::di::{build_app_module, CacheResolver, DatabaseResolver};
use crate::startup::print_startup_info;
use axum::Router;
use orderly_config::AppConfig;
use orderly_core::{OrderlyError, OrderlyResult};
use orderly_repository::{DatabasePool, DatabasePoolInterface};
use orderly_rest::create_router;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Connects dependencies and serves until a shutdown signal arrives.
    pub async fn run(self) -> OrderlyResult<()> {
        let config = self.config.unwrap_or_default();

        let db_pool = DatabasePool::connect(&config.database).await?;
        if config.database.run_migrations {
            db_pool.run_migrations().await?;
        }

        let module = build_app_module(&db_pool, &config.redis).await?;

        if config.app.is_development() && config.redis.flush_on_startup {
            match module.cache().clear().await {
                Ok(()) => info!("Cache flushed on startup"),
                Err(e) => warn!("Failed to flush cache on startup: {}", e),
            }
        }

        let router = create_router(module.app_state(), &config.server);

        let addr = config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| OrderlyError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
        print_startup_info(&addr);

        let result = serve(listener, router, shutdown_signal()).await;

        module.database_pool().close().await;
        info!("Server shutdown complete");
        result
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> OrderlyResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| OrderlyError::Internal(format!("REST server error: {}", e)))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[test]
    fn test_app_builder_new() {
        let builder = AppBuilder::new();
        assert!(builder.config.is_none());
    }

    #[test]
    fn test_app_builder_default() {
        let builder = AppBuilder::default();
        assert!(builder.config.is_none());
    }

    #[test]
    fn test_app_builder_with_config() {
        let config = AppConfig::default();
        let builder = AppBuilder::new().with_config(config);
        assert!(builder.config.is_some());
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let router = Router::new().route("/", get(|| async { "ok" }));

        let result = serve(listener, router, async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_answers_requests() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/", get(|| async { "Orderly API v1" }));

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, router, async {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("Orderly API v1"));

        tx.send(()).unwrap();
        assert!(server.await.unwrap().is_ok());
    }
}
