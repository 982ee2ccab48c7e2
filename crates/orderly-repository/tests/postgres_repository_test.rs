//! Integration tests for the PostgreSQL repositories.
//!
//! These tests run against a real PostgreSQL database using testcontainers.
//! Requires Docker; run with `cargo test -- --ignored`.

mod common;

use chrono::{Duration, Utc};
use common::TestDatabase;
use orderly_core::{
    History, HistoryId, ListRange, Order, OrderlyError, Repository, User,
};
use orderly_repository::{PgHistoryRepository, PgOrderRepository, PgUserRepository};

fn tomorrow() -> chrono::DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let user = User::new("Ada Lovelace");
    let created = repo.create(&user).await.expect("Failed to create user");
    assert!(created.id.is_assigned());

    let found = repo
        .find_by_id(created.id)
        .await
        .expect("Query failed")
        .expect("User not found");

    assert_eq!(found, created);
    assert_eq!(found.full_name, user.full_name);
    assert_eq!(found.first_order, user.first_order);
    assert_eq!(found.created_at, user.created_at);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ids_are_monotonic() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.pool());

    let first = repo.create(&Order::new("a", 1, tomorrow())).await.unwrap();
    repo.delete(&first).await.unwrap();
    let second = repo.create(&Order::new("b", 1, tomorrow())).await.unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_respects_take_and_skip() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.pool());

    let mut ids = Vec::new();
    for i in 1..=5 {
        let order = repo
            .create(&Order::new(format!("order {i}"), i, tomorrow()))
            .await
            .unwrap();
        ids.push(order.id);
    }

    for take in [-1, 0, 1, 5] {
        for skip in [-1, 0, 2] {
            let range = ListRange::new(take, skip);
            let listed: Vec<_> = repo
                .find_all(range)
                .await
                .unwrap()
                .into_iter()
                .map(|o| o.id)
                .collect();
            assert_eq!(listed, range.slice(&ids), "take={take} skip={skip}");
        }
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_is_soft_and_idempotent() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let user = repo.create(&User::new("Grace")).await.unwrap();
    repo.delete(&user).await.expect("first delete");
    repo.delete(&user).await.expect("second delete is a no-op");

    assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    assert!(repo.find_all(ListRange::all()).await.unwrap().is_empty());

    let deleted_at: Option<chrono::DateTime<Utc>> =
        sqlx::query_scalar("SELECT deleted_at FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_one(db.pool().inner())
            .await
            .unwrap();
    assert!(deleted_at.is_some(), "row persists physically");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_updates_fields_and_timestamp() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.pool());

    let mut order = repo.create(&Order::new("Tea", 3, tomorrow())).await.unwrap();
    order.price = 4;
    let saved = repo.save(&order).await.unwrap();

    assert_eq!(saved.price, 4);
    assert!(saved.updated_at >= order.updated_at);
    assert_eq!(repo.find_by_id(order.id).await.unwrap().unwrap().price, 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_deleted_row_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let user = repo.create(&User::new("Linus")).await.unwrap();
    repo.delete(&user).await.unwrap();

    let err = repo.save(&user).await.unwrap_err();
    assert!(matches!(err, OrderlyError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dangling_history_reference_is_store_error() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let err = repo
        .create(&User::new("Orphan").with_history(HistoryId(9_999)))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderlyError::Store(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_history_preloads_user_and_orders() {
    let db = TestDatabase::new().await;
    let histories = PgHistoryRepository::new(db.pool());
    let users = PgUserRepository::new(db.pool());
    let orders = PgOrderRepository::new(db.pool());

    let history = histories.create(&History::new("x")).await.unwrap();
    let user = users
        .create(&User::new("A").with_history(history.id))
        .await
        .unwrap();
    let first = orders
        .create(&Order::new("o1", 2, tomorrow()).with_history(history.id))
        .await
        .unwrap();
    let second = orders
        .create(&Order::new("o2", 5, tomorrow()).with_history(history.id))
        .await
        .unwrap();

    let found = histories.find_by_id(history.id).await.unwrap().unwrap();
    assert_eq!(found.descriptions, "x");
    assert_eq!(found.user.as_ref().map(|u| u.id), Some(user.id));
    let order_ids: Vec<_> = found.orders.iter().map(|o| o.id).collect();
    assert_eq!(order_ids, vec![first.id, second.id]);

    let listed = histories.find_all(ListRange::all()).await.unwrap();
    assert_eq!(listed, vec![found.clone()]);

    // Soft-deleted associations drop out of the preload.
    orders.delete(&first).await.unwrap();
    let found = histories.find_by_id(history.id).await.unwrap().unwrap();
    assert_eq!(found.orders.len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_first_history_page_embeds_user_without_orders() {
    let db = TestDatabase::new().await;
    let histories = PgHistoryRepository::new(db.pool());
    let users = PgUserRepository::new(db.pool());

    let history = histories.create(&History::new("test")).await.unwrap();
    assert_eq!(history.id, HistoryId(1));
    let alice = users
        .create(&User::new("Alice").with_history(HistoryId(1)))
        .await
        .unwrap();

    let page = histories.find_all(ListRange::new(1, 0)).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, HistoryId(1));
    assert_eq!(page[0].descriptions, "test");
    let user = page[0].user.as_ref().expect("user not preloaded");
    assert_eq!(user.id, alice.id);
    assert_eq!(user.full_name, "Alice");
    assert!(page[0].orders.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_history_save_keeps_associations() {
    let db = TestDatabase::new().await;
    let histories = PgHistoryRepository::new(db.pool());
    let users = PgUserRepository::new(db.pool());

    let mut history = histories.create(&History::new("before")).await.unwrap();
    users
        .create(&User::new("B").with_history(history.id))
        .await
        .unwrap();

    history.descriptions = "after".to_string();
    let saved = histories.save(&history).await.unwrap();

    assert_eq!(saved.descriptions, "after");
    assert!(saved.user.is_some());
}
