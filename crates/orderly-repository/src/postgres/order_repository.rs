//! PostgreSQL order repository implementation.

use crate::DatabasePoolInterface;
use async_trait::async_trait;
use orderly_core::{now_millis, ListRange, Order, OrderId, OrderlyError, OrderlyResult, Repository};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL order repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = Repository<Order>)]
pub struct PgOrderRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgOrderRepository {
    /// Creates a new PostgreSQL order repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Order> for PgOrderRepository {
    async fn create(&self, order: &Order) -> OrderlyResult<Order> {
        debug!("Creating order: {}", order.name);
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (name, price, expired_at, histories_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, price, expired_at, histories_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&order.name)
        .bind(order.price)
        .bind(order.expired_at)
        .bind(order.histories_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: OrderId) -> OrderlyResult<Option<Order>> {
        debug!("Finding order by id: {}", id);
        let mut conn = self.pool.acquire().await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, name, price, expired_at, histories_id,
                   created_at, updated_at, deleted_at
            FROM orders
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    async fn find_all(&self, range: ListRange) -> OrderlyResult<Vec<Order>> {
        debug!("Listing orders: take={}, skip={}", range.take, range.skip);
        let mut conn = self.pool.acquire().await?;

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, name, price, expired_at, histories_id,
                   created_at, updated_at, deleted_at
            FROM orders
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(range.limit())
        .bind(range.offset())
        .fetch_all(&mut *conn)
        .await?;

        Ok(orders)
    }

    async fn save(&self, order: &Order) -> OrderlyResult<Order> {
        debug!("Saving order: {}", order.id);
        let mut conn = self.pool.acquire().await?;

        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET name = $2, price = $3, expired_at = $4, histories_id = $5, updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, price, expired_at, histories_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(order.id)
        .bind(&order.name)
        .bind(order.price)
        .bind(order.expired_at)
        .bind(order.histories_id)
        .bind(now_millis())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| OrderlyError::not_found("Order", order.id))
    }

    async fn delete(&self, order: &Order) -> OrderlyResult<()> {
        debug!("Soft-deleting order: {}", order.id);
        let mut conn = self.pool.acquire().await?;

        sqlx::query("UPDATE orders SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(order.id)
            .bind(now_millis())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
