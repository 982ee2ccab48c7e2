//! PostgreSQL user repository implementation.

use crate::DatabasePoolInterface;
use async_trait::async_trait;
use orderly_core::{now_millis, ListRange, OrderlyError, OrderlyResult, Repository, User, UserId};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = Repository<User>)]
pub struct PgUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User> for PgUserRepository {
    async fn create(&self, user: &User) -> OrderlyResult<User> {
        debug!("Creating user: {}", user.full_name);
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, first_order, histories_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, first_order, histories_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&user.full_name)
        .bind(user.first_order)
        .bind(user.histories_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> OrderlyResult<Option<User>> {
        debug!("Finding user by id: {}", id);
        let mut conn = self.pool.acquire().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, first_order, histories_id,
                   created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    async fn find_all(&self, range: ListRange) -> OrderlyResult<Vec<User>> {
        debug!("Listing users: take={}, skip={}", range.take, range.skip);
        let mut conn = self.pool.acquire().await?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, first_order, histories_id,
                   created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(range.limit())
        .bind(range.offset())
        .fetch_all(&mut *conn)
        .await?;

        Ok(users)
    }

    async fn save(&self, user: &User) -> OrderlyResult<User> {
        debug!("Saving user: {}", user.id);
        let mut conn = self.pool.acquire().await?;

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = $2, first_order = $3, histories_id = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, full_name, first_order, histories_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(user.id)
        .bind(&user.full_name)
        .bind(user.first_order)
        .bind(user.histories_id)
        .bind(now_millis())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| OrderlyError::not_found("User", user.id))
    }

    async fn delete(&self, user: &User) -> OrderlyResult<()> {
        debug!("Soft-deleting user: {}", user.id);
        let mut conn = self.pool.acquire().await?;

        sqlx::query("UPDATE users SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(user.id)
            .bind(now_millis())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
