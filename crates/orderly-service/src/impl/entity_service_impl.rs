//! Cache-aside entity service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_TTL};
use crate::entity_service::EntityService;
use async_trait::async_trait;
use orderly_core::{
    History, HistoryId, ListRange, Order, OrderlyError, OrderlyResult, Repository, Resource, User,
    ValidateExt,
};
use shaku::Component;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cache keys to drop after a mutation.
#[derive(Debug, Default, PartialEq, Eq)]
struct Invalidation {
    keys: Vec<String>,
    prefixes: Vec<String>,
}

impl Invalidation {
    /// The collection listings of `R`, plus every History embedding one of
    /// `refs` and the History listings.
    fn collection<R: Resource>(refs: &[Option<HistoryId>]) -> Self {
        let mut keys = vec![cache_keys::collection::<R>(ListRange::all())];
        let mut prefixes = vec![cache_keys::collection_prefix::<R>()];

        let mut histories: Vec<HistoryId> = refs.iter().flatten().copied().collect();
        histories.sort_unstable();
        histories.dedup();

        if !histories.is_empty() {
            keys.extend(histories.into_iter().map(cache_keys::history));
            keys.push(cache_keys::collection::<History>(ListRange::all()));
            prefixes.push(cache_keys::collection_prefix::<History>());
        }

        Self { keys, prefixes }
    }

    /// Like [`Invalidation::collection`], plus the entity key itself.
    fn entity<R: Resource>(id: R::Id, refs: &[Option<HistoryId>]) -> Self {
        let mut invalidation = Self::collection::<R>(refs);
        invalidation.keys.insert(0, cache_keys::entity::<R>(id));
        invalidation
    }
}

/// Entity service backed by a repository and a cache.
#[derive(Component)]
#[shaku(interface = EntityService<R>)]
pub struct EntityServiceImpl<R: Resource> {
    #[shaku(inject)]
    repository: Arc<dyn Repository<R>>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    /// TTL of cached entities and listings.
    #[shaku(default = DEFAULT_TTL)]
    ttl: Duration,
    #[shaku(default)]
    marker: PhantomData<fn() -> R>,
}

/// User service component.
pub type UserServiceComponent = EntityServiceImpl<User>;

/// Order service component.
pub type OrderServiceComponent = EntityServiceImpl<Order>;

/// History service component.
pub type HistoryServiceComponent = EntityServiceImpl<History>;

impl<R: Resource> EntityServiceImpl<R> {
    /// Creates a new entity service.
    pub fn new(repository: Arc<dyn Repository<R>>, cache: Arc<dyn CacheInterface>) -> Self {
        Self::with_ttl(repository, cache, DEFAULT_TTL)
    }

    /// Creates an entity service with a custom cache TTL.
    pub fn with_ttl(
        repository: Arc<dyn Repository<R>>,
        cache: Arc<dyn CacheInterface>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            ttl,
            marker: PhantomData,
        }
    }

    async fn invalidate(&self, invalidation: &Invalidation) {
        debug!("Invalidating {:?}", invalidation);
        self.cache
            .invalidate(&invalidation.keys, &invalidation.prefixes)
            .await;
    }

    async fn find_existing(&self, id: R::Id) -> OrderlyResult<R> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderlyError::not_found(R::NAME, id))
    }
}

#[async_trait]
impl<R: Resource> EntityService<R> for EntityServiceImpl<R> {
    async fn create(&self, payload: R::Payload) -> OrderlyResult<R> {
        debug!("Creating {}: {:?}", R::KIND, payload);

        let entity = R::draft(payload);
        entity.validate_request()?;

        let created = self.repository.create(&entity).await?;
        self.invalidate(&Invalidation::collection::<R>(&[created.history_ref()]))
            .await;

        info!("{} created: {}", R::NAME, created.id());
        Ok(created)
    }

    async fn list(&self, range: ListRange) -> OrderlyResult<Vec<R>> {
        debug!("Listing {}: take={}, skip={}", R::COLLECTION, range.take, range.skip);

        let key = cache_keys::collection::<R>(range);
        self.cache
            .get_or_populate(&key, self.ttl, || self.repository.find_all(range))
            .await
    }

    async fn get(&self, id: R::Id) -> OrderlyResult<R> {
        debug!("Getting {}: {}", R::KIND, id);

        let key = cache_keys::entity::<R>(id);
        self.cache
            .get_or_populate(&key, self.ttl, || self.find_existing(id))
            .await
    }

    async fn update(&self, id: R::Id, payload: R::Payload) -> OrderlyResult<R> {
        debug!("Updating {}: {}", R::KIND, id);

        let mut entity = self.find_existing(id).await?;
        let previous_ref = entity.history_ref();

        entity.apply(payload);
        entity.validate_request()?;

        let entity_key = cache_keys::entity::<R>(id);
        self.cache.invalidate(std::slice::from_ref(&entity_key), &[]).await;

        let saved = self.repository.save(&entity).await?;
        self.invalidate(&Invalidation::entity::<R>(
            id,
            &[previous_ref, saved.history_ref()],
        ))
        .await;

        info!("{} updated: {}", R::NAME, id);
        Ok(saved)
    }

    async fn delete(&self, id: R::Id) -> OrderlyResult<R> {
        debug!("Deleting {}: {}", R::KIND, id);

        let entity = self.find_existing(id).await?;
        let invalidation = Invalidation::entity::<R>(id, &[entity.history_ref()]);

        self.invalidate(&invalidation).await;
        self.repository.delete(&entity).await?;
        self.invalidate(&invalidation).await;

        info!("{} deleted: {}", R::NAME, id);
        Ok(entity)
    }
}
