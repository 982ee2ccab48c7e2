//! Application state for Axum handlers.

use orderly_core::{HealthCheck, History, Order, User};
use orderly_service::EntityService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn EntityService<User>>,
    pub order_service: Arc<dyn EntityService<Order>>,
    pub history_service: Arc<dyn EntityService<History>>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn EntityService<User>>,
        order_service: Arc<dyn EntityService<Order>>,
        history_service: Arc<dyn EntityService<History>>,
    ) -> Self {
        Self {
            user_service,
            order_service,
            history_service,
            health_checks: Vec::new(),
        }
    }

    /// Adds a dependency checked by the readiness endpoint.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
