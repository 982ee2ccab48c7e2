//! PostgreSQL history repository implementation.
//!
//! Every read preloads the owning user and the attached orders on the
//! same connection as the history rows.

use crate::DatabasePoolInterface;
use async_trait::async_trait;
use orderly_core::{
    now_millis, History, HistoryId, ListRange, Order, OrderlyError, OrderlyResult, Repository,
    User,
};
use sqlx::PgConnection;
use std::collections::HashMap;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL history repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = Repository<History>)]
pub struct PgHistoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgHistoryRepository {
    /// Creates a new PostgreSQL history repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Loads users and orders for `histories` and attaches them.
async fn preload(conn: &mut PgConnection, histories: &mut [History]) -> OrderlyResult<()> {
    if histories.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = histories.iter().map(|h| h.id.into_inner()).collect();
    debug!("Preloading associations for {} histories", ids.len());

    // First live user by id per history.
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT DISTINCT ON (histories_id)
               id, full_name, first_order, histories_id,
               created_at, updated_at, deleted_at
        FROM users
        WHERE histories_id = ANY($1) AND deleted_at IS NULL
        ORDER BY histories_id, id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, name, price, expired_at, histories_id,
               created_at, updated_at, deleted_at
        FROM orders
        WHERE histories_id = ANY($1) AND deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    attach_associations(histories, users, orders);
    Ok(())
}

/// Distributes preloaded rows onto their parent histories.
///
/// `users` keeps the first user seen per history; `orders` keep their
/// input order.
pub(crate) fn attach_associations(histories: &mut [History], users: Vec<User>, orders: Vec<Order>) {
    let mut users_by_history: HashMap<HistoryId, User> = HashMap::new();
    for user in users {
        if let Some(history_id) = user.histories_id {
            users_by_history.entry(history_id).or_insert(user);
        }
    }

    let mut orders_by_history: HashMap<HistoryId, Vec<Order>> = HashMap::new();
    for order in orders {
        if let Some(history_id) = order.histories_id {
            orders_by_history.entry(history_id).or_default().push(order);
        }
    }

    for history in histories.iter_mut() {
        history.user = users_by_history.remove(&history.id);
        history.orders = orders_by_history.remove(&history.id).unwrap_or_default();
    }
}

#[async_trait]
impl Repository<History> for PgHistoryRepository {
    async fn create(&self, history: &History) -> OrderlyResult<History> {
        debug!("Creating history");
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, History>(
            r#"
            INSERT INTO histories (descriptions, created_at, updated_at)
            VALUES ($1, $2, $3)
            RETURNING id, descriptions, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&history.descriptions)
        .bind(history.created_at)
        .bind(history.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: HistoryId) -> OrderlyResult<Option<History>> {
        debug!("Finding history by id: {}", id);
        let mut conn = self.pool.acquire().await?;

        let history = sqlx::query_as::<_, History>(
            r#"
            SELECT id, descriptions, created_at, updated_at, deleted_at
            FROM histories
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(history) = history else {
            return Ok(None);
        };

        let mut loaded = [history];
        preload(&mut *conn, &mut loaded).await?;
        let [history] = loaded;
        Ok(Some(history))
    }

    async fn find_all(&self, range: ListRange) -> OrderlyResult<Vec<History>> {
        debug!("Listing histories: take={}, skip={}", range.take, range.skip);
        let mut conn = self.pool.acquire().await?;

        let mut histories = sqlx::query_as::<_, History>(
            r#"
            SELECT id, descriptions, created_at, updated_at, deleted_at
            FROM histories
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(range.limit())
        .bind(range.offset())
        .fetch_all(&mut *conn)
        .await?;

        preload(&mut *conn, &mut histories).await?;
        Ok(histories)
    }

    async fn save(&self, history: &History) -> OrderlyResult<History> {
        debug!("Saving history: {}", history.id);
        let mut conn = self.pool.acquire().await?;

        // Associations are owned by users/orders; only history columns are written.
        let saved = sqlx::query_as::<_, History>(
            r#"
            UPDATE histories
            SET descriptions = $2, updated_at = $3
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, descriptions, created_at, updated_at, deleted_at
            "#,
        )
        .bind(history.id)
        .bind(&history.descriptions)
        .bind(now_millis())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| OrderlyError::not_found("History", history.id))?;

        let mut loaded = [saved];
        preload(&mut *conn, &mut loaded).await?;
        let [saved] = loaded;
        Ok(saved)
    }

    async fn delete(&self, history: &History) -> OrderlyResult<()> {
        debug!("Soft-deleting history: {}", history.id);
        let mut conn = self.pool.acquire().await?;

        sqlx::query("UPDATE histories SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(history.id)
            .bind(now_millis())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
