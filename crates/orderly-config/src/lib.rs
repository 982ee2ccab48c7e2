//! # Orderly Config
//!
//! Configuration management for Orderly.
//! Supports layered configuration from files, `ORDERLY__*` environment
//! variables, and the legacy `DB_*`/`REDIS_*`/`APP_ENV` variables.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
