//! # Orderly Service
//!
//! Entity services for Orderly. Each resource is served through the same
//! cache-aside pipeline: validate, consult the cache, fall back to the
//! store, and invalidate on every mutation.

pub mod cache;
pub mod entity_service;
pub mod r#impl;

pub use cache::*;
pub use entity_service::*;
pub use r#impl::*;
