//! Entity service trait definition.

use async_trait::async_trait;
use orderly_core::{Interface, ListRange, OrderlyResult, Resource};

/// CRUD use cases for one resource type.
#[async_trait]
pub trait EntityService<R: Resource>: Interface + Send + Sync {
    /// Validates the payload and persists a new entity.
    async fn create(&self, payload: R::Payload) -> OrderlyResult<R>;

    /// Lists live entities in creation order.
    async fn list(&self, range: ListRange) -> OrderlyResult<Vec<R>>;

    /// Gets an entity by ID.
    async fn get(&self, id: R::Id) -> OrderlyResult<R>;

    /// Overwrites an entity's mutable fields.
    async fn update(&self, id: R::Id, payload: R::Payload) -> OrderlyResult<R>;

    /// Soft-deletes an entity and returns it as it was before deletion.
    async fn delete(&self, id: R::Id) -> OrderlyResult<R>;
}
