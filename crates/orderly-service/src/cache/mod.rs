//! Caching infrastructure for the service layer.
//!
//! A remote Redis tier, a local `moka` tier, and a `TieredCache` combining
//! both behind the same `CacheInterface`.

mod cache_interface;
pub mod cache_keys;
mod local_cache;
mod redis_cache;
mod tiered_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use local_cache::LocalCache;
pub use redis_cache::{RedisCacheService, DEFAULT_TTL};
pub use tiered_cache::{TieredCache, TieredCacheParameters};
