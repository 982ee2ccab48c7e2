//! Core traits shared by the store, cache, and service layers.

use crate::{HistoryId, ListRange, OrderlyResult, Schema};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shaku::Interface;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An entity type plugged into the generic store/cache/service machinery.
///
/// `Schema::KIND` doubles as the singular cache key prefix (`order:{id}`)
/// and `COLLECTION` as the listing key (`orders`).
pub trait Resource:
    Schema + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Typed identifier.
    type Id: Copy + Debug + Display + Eq + Hash + From<u32> + Send + Sync + 'static;

    /// Inbound data for create and update.
    type Payload: DeserializeOwned + Debug + Send + Sync + 'static;

    /// Plural name used for the collection key and messages (`orders`).
    const COLLECTION: &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> Self::Id;

    /// Builds an unsaved entity from a payload.
    fn draft(payload: Self::Payload) -> Self;

    /// Overwrites the mutable fields with a payload.
    fn apply(&mut self, payload: Self::Payload);

    /// The History this entity is embedded in when Histories are read.
    fn history_ref(&self) -> Option<HistoryId> {
        None
    }
}

/// Durable CRUD over one resource type.
///
/// Soft-deleted rows are invisible to every read. Each call acquires a
/// pooled connection and releases it before returning.
#[async_trait]
pub trait Repository<T: Resource>: Interface {
    /// Inserts a new row and returns it with its generated id.
    async fn create(&self, entity: &T) -> OrderlyResult<T>;

    /// Finds a live row by id.
    async fn find_by_id(&self, id: T::Id) -> OrderlyResult<Option<T>>;

    /// Lists live rows in creation order, windowed by `range`.
    async fn find_all(&self, range: ListRange) -> OrderlyResult<Vec<T>>;

    /// Persists mutable fields and refreshes `updated_at`.
    ///
    /// Returns `NotFound` when the row is absent or soft-deleted.
    async fn save(&self, entity: &T) -> OrderlyResult<T>;

    /// Soft-deletes the row. Deleting an already deleted row is a no-op.
    async fn delete(&self, entity: &T) -> OrderlyResult<()>;
}

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}
