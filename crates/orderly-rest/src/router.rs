//! Main application router.

use crate::{
    controllers::{health_controller, resource_controller},
    middleware::logging_middleware,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use orderly_config::ServerConfig;
use orderly_core::{History, Order, Resource, User};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::info;

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let api_router = Router::new()
        .nest(
            &collection_path::<User>(),
            resource_controller::router(state.user_service),
        )
        .nest(
            &collection_path::<Order>(),
            resource_controller::router(state.order_service),
        )
        .nest(
            &collection_path::<History>(),
            resource_controller::router(state.history_service),
        );

    let mut router = Router::new()
        // Health endpoints
        .merge(health_controller::router(Arc::new(state.health_checks)))
        // API v1
        .nest("/api/v1", api_router)
        // Root endpoint
        .route("/", get(root));

    if server_config.compression_enabled {
        router = router.layer(CompressionLayer::new());
    }
    if server_config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    let router = router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(server_config.request_timeout()))
            .layer(DefaultBodyLimit::max(server_config.max_body_size)),
    );

    info!("Router created with REST endpoints under /api/v1");
    router
}

fn collection_path<R: Resource>() -> String {
    format!("/{}", R::COLLECTION)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Orderly API v1"
}
