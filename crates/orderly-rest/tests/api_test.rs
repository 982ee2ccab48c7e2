//! Router tests driving the full handler/service/cache stack over an
//! in-memory store.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use orderly_config::ServerConfig;
use orderly_core::{
    HealthCheck, HealthStatus, History, HistoryId, ListRange, Order, OrderId, OrderlyError,
    OrderlyResult, Repository, Resource, User, UserId,
};
use orderly_rest::{create_router, AppState};
use orderly_service::{EntityServiceImpl, LocalCache};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// In-memory store keyed by id; soft-deleted rows stay in the map.
struct InMemoryRepository<R> {
    rows: Mutex<BTreeMap<i64, (R, bool)>>,
    assign: fn(&mut R, i64),
}

impl<R> InMemoryRepository<R> {
    fn new(assign: fn(&mut R, i64)) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(BTreeMap::new()),
            assign,
        })
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for InMemoryRepository<R>
where
    R::Id: Into<i64>,
{
    async fn create(&self, entity: &R) -> OrderlyResult<R> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let mut row = entity.clone();
        (self.assign)(&mut row, id);
        rows.insert(id, (row.clone(), false));
        Ok(row)
    }

    async fn find_by_id(&self, id: R::Id) -> OrderlyResult<Option<R>> {
        let id: i64 = id.into();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|(_, deleted)| !deleted)
            .map(|(row, _)| row.clone()))
    }

    async fn find_all(&self, range: ListRange) -> OrderlyResult<Vec<R>> {
        let rows: Vec<R> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|(_, deleted)| !deleted)
            .map(|(row, _)| row.clone())
            .collect();
        Ok(range.slice(&rows))
    }

    async fn save(&self, entity: &R) -> OrderlyResult<R> {
        let id: i64 = entity.id().into();
        match self.rows.lock().unwrap().get_mut(&id) {
            Some((row, false)) => {
                *row = entity.clone();
                Ok(row.clone())
            }
            _ => Err(OrderlyError::not_found(R::NAME, id)),
        }
    }

    async fn delete(&self, entity: &R) -> OrderlyResult<()> {
        let id: i64 = entity.id().into();
        if let Some((_, deleted)) = self.rows.lock().unwrap().get_mut(&id) {
            *deleted = true;
        }
        Ok(())
    }
}

struct StaticCheck(bool);

#[async_trait]
impl HealthCheck for StaticCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        if self.0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy("connection refused".to_string())
        }
    }
}

fn app_with_health(healthy: bool) -> Router {
    let cache = Arc::new(LocalCache::new(100, Duration::from_secs(60)));

    let users: Arc<InMemoryRepository<User>> =
        InMemoryRepository::new(|u: &mut User, id| u.id = UserId(id));
    let orders: Arc<InMemoryRepository<Order>> =
        InMemoryRepository::new(|o: &mut Order, id| o.id = OrderId(id));
    let histories: Arc<InMemoryRepository<History>> =
        InMemoryRepository::new(|h: &mut History, id| h.id = HistoryId(id));

    let state = AppState::new(
        Arc::new(EntityServiceImpl::<User>::new(users, cache.clone())),
        Arc::new(EntityServiceImpl::<Order>::new(orders, cache.clone())),
        Arc::new(EntityServiceImpl::<History>::new(histories, cache)),
    )
    .with_health_check(Arc::new(StaticCheck(healthy)));

    create_router(state, &ServerConfig::default())
}

fn app() -> Router {
    app_with_health(true)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn order_body(name: &str, price: i64) -> Value {
    json!({
        "name": name,
        "price": price,
        "expired_at": "2030-01-01T00:00:00Z",
    })
}

#[tokio::test]
async fn test_create_order() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/v1/orders", Some(order_body("Tea", 3))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["message"], "Successfully created new order.");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["price"], 3);
}

#[tokio::test]
async fn test_create_accepts_legacy_field_names() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "FullName": "Ada", "FirstOrder": false })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["full_name"], "Ada");
    assert_eq!(body["data"]["first_order"], false);
}

#[tokio::test]
async fn test_zero_price_is_single_min_violation() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/v1/orders", Some(order_body("Tea", 0))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to validate order.");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["namespace"], "Order.Price");
    assert_eq!(details[0]["field"], "Price");
    assert_eq!(details[0]["rule"], "min");
    assert_eq!(details[0]["value"], 0);
    assert_eq!(details[0]["param"], "1");
}

#[tokio::test]
async fn test_malformed_body_is_bind_error() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/histories")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"descriptions\":"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "BIND_ERROR");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/users/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_numeric_id_is_parse_error() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/users/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_list_with_take_and_skip() {
    let app = app();
    for i in 1..=4 {
        send(&app, Method::POST, "/api/v1/orders", Some(order_body(&format!("o{i}"), i))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully get all orders.");
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (_, body) = send(&app, Method::GET, "/api/v1/orders?take=2&skip=1", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["o2", "o3"]);

    let (_, body) = send(&app, Method::GET, "/api/v1/orders?take=0", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_take_is_parse_error() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/orders?take=ten", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_update_is_visible_after_cached_read() {
    let app = app();
    send(&app, Method::POST, "/api/v1/histories", Some(json!({ "descriptions": "x" }))).await;
    send(&app, Method::GET, "/api/v1/histories/1", None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/histories/1",
        Some(json!({ "descriptions": "y" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully updated history.");

    let (_, body) = send(&app, Method::GET, "/api/v1/histories/1", None).await;
    assert_eq!(body["message"], "Successfully get history.");
    assert_eq!(body["data"]["descriptions"], "y");
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = app();
    send(&app, Method::POST, "/api/v1/users", Some(json!({ "full_name": "Grace" }))).await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully deleted user.");
    assert_eq!(body["data"]["full_name"], "Grace");

    let (status, _) = send(&app, Method::GET, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_root() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"][0]["name"], "database");

    let (status, _) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_ready_reports_unhealthy_database() {
    let app = app_with_health(false);

    let (status, body) = send(&app, Method::GET, "/ready", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"][0]["healthy"], false);
    assert_eq!(body["checks"][0]["error"], "connection refused");
}
