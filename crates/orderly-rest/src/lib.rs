//! # Orderly REST
//!
//! REST API layer using Axum for Orderly.
//! Exposes CRUD endpoints for users, orders, and histories plus health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
