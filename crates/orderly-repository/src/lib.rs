//! # Orderly Repository
//!
//! The entity store: durable CRUD over PostgreSQL with soft delete and
//! History association preloading.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn Repository<T>>       (orderly-core seam)
//! PgUserRepository / PgOrderRepository / PgHistoryRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! Each operation acquires its own pooled connection and releases it on
//! return. Soft-deleted rows are excluded from every read.

pub mod pool;
pub mod postgres;

pub use pool::*;
pub use postgres::*;
