//! Generic CRUD controller.
//!
//! One router per resource, mounted under `/api/v1/{collection}`.

use crate::{
    extractors::{Pagination, Payload, ResourceId},
    responses::{created, ok, ApiResult},
};
use axum::{extract::State, routing::get, Router};
use orderly_core::Resource;
use orderly_service::EntityService;
use std::sync::Arc;
use tracing::debug;

/// Service handle shared by a resource's handlers.
pub type ServiceState<R> = Arc<dyn EntityService<R>>;

/// Creates the CRUD router for `R`.
pub fn router<R: Resource>(service: ServiceState<R>) -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", get(show::<R>).put(update::<R>).delete(destroy::<R>))
        .with_state(service)
}

async fn create<R: Resource>(
    State(service): State<ServiceState<R>>,
    Payload(payload): Payload<R::Payload>,
) -> ApiResult<R> {
    debug!("Create {} request", R::KIND);

    let entity = service.create(payload).await?;
    created(format!("Successfully created new {}.", R::KIND), entity)
}

async fn list<R: Resource>(
    State(service): State<ServiceState<R>>,
    Pagination(range): Pagination,
) -> ApiResult<Vec<R>> {
    debug!("List {} request: take={}, skip={}", R::COLLECTION, range.take, range.skip);

    let entities = service.list(range).await?;
    ok(format!("Successfully get all {}.", R::COLLECTION), entities)
}

async fn show<R: Resource>(
    State(service): State<ServiceState<R>>,
    ResourceId(id): ResourceId<R>,
) -> ApiResult<R> {
    debug!("Get {} request: {}", R::KIND, id);

    let entity = service.get(id).await?;
    ok(format!("Successfully get {}.", R::KIND), entity)
}

async fn update<R: Resource>(
    State(service): State<ServiceState<R>>,
    ResourceId(id): ResourceId<R>,
    Payload(payload): Payload<R::Payload>,
) -> ApiResult<R> {
    debug!("Update {} request: {}", R::KIND, id);

    let entity = service.update(id, payload).await?;
    ok(format!("Successfully updated {}.", R::KIND), entity)
}

async fn destroy<R: Resource>(
    State(service): State<ServiceState<R>>,
    ResourceId(id): ResourceId<R>,
) -> ApiResult<R> {
    debug!("Delete {} request: {}", R::KIND, id);

    let entity = service.delete(id).await?;
    ok(format!("Successfully deleted {}.", R::KIND), entity)
}
