//! Health check controller.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use orderly_core::HealthCheck;
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Readiness response with one entry per dependency.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<CheckResult>,
}

/// Outcome of a single dependency check.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dependencies checked by `/ready`.
pub type HealthChecks = Arc<Vec<Arc<dyn HealthCheck>>>;

/// Creates the health router.
pub fn router(checks: HealthChecks) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .with_state(checks)
}

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint; 503 when any dependency is down.
pub async fn readiness_check(State(checks): State<HealthChecks>) -> impl IntoResponse {
    let mut results = Vec::with_capacity(checks.len());
    for check in checks.iter() {
        let status = check.check().await;
        results.push(CheckResult {
            name: check.name().to_string(),
            healthy: status.is_healthy(),
            error: match status {
                orderly_core::HealthStatus::Healthy => None,
                orderly_core::HealthStatus::Unhealthy(reason) => Some(reason),
            },
        });
    }

    let ready = results.iter().all(|r| r.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "unavailable" }.to_string(),
            checks: results,
        }),
    )
}
