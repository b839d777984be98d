use axum::body::{ to_bytes, Body };
use axum::http::{ Request, StatusCode };
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use carbdex::cache::ResponseCache;
use carbdex::config::{
    CacheConfig,
    Config,
    DatabaseConfig,
    Environment,
    RedisConfig,
    SecurityConfig,
    ServerConfig,
};
use carbdex::db::AppState;
use carbdex::routes::create_routes;
use carbdex::store::FoodStore;

/// Router over a lazy pool that never opens a connection: every request
/// exercised here must be rejected (or short-circuited) before any
/// store access happens.
fn test_app() -> Router {
    let config = Config {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            environment: Environment::Development,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unreachable".to_string(),
            max_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
        },
        cache: CacheConfig {
            enabled: false,
            ttl_secs: 60,
        },
        security: SecurityConfig {
            cors_enabled: false,
            allowed_origins: Vec::new(),
        },
    };

    let pool = sqlx::postgres::PgPoolOptions
        ::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    create_routes(AppState {
        store: FoodStore::new(pool),
        cache: ResponseCache::disabled(),
        config,
    })
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = test_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
        .unwrap();

    read(response).await
}

async fn send_json(method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        ).await
        .unwrap();

    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn assert_invalid(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "expected error envelope, got {}", body);
}

#[tokio::test]
async fn status_reports_healthy() {
    let (status, body) = get("/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Carbdex API");
}

#[tokio::test]
async fn negative_start_is_rejected_before_store_access() {
    let (status, body) = get("/foods?start=-1").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn non_integer_range_bounds_are_rejected() {
    let (status, body) = get("/foods?start=abc").await;
    assert_invalid(status, &body);

    let (status, body) = get("/foods?start=0&end=ten").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn end_must_exceed_start() {
    let (status, body) = get("/foods?start=10&end=10").await;
    assert_invalid(status, &body);

    let (status, body) = get("/foods?start=10&end=3").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn search_rejects_bad_order() {
    let (status, body) = get("/foods/search?q=bread&order=sideways").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn search_rejects_unknown_sort_field() {
    let (status, body) = get("/foods/search?q=bread&sort_by=nonexistent").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn search_rejects_non_positive_pagination() {
    let (status, body) = get("/foods/search?q=bread&page=0").await;
    assert_invalid(status, &body);

    let (status, body) = get("/foods/search?q=bread&per_page=0").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn empty_search_query_matches_nothing() {
    let (status, body) = get("/foods/search").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["total_pages"], 0);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["items"], Value::Array(Vec::new()));

    let (status, body) = get("/foods/search?q=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn paginated_rejects_non_positive_pagination() {
    let (status, body) = get("/foods/paginated?page=0").await;
    assert_invalid(status, &body);

    let (status, body) = get("/foods/paginated?page=1&per_page=-5").await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn create_requires_product_name_and_carbohydrates() {
    let (status, body) = send_json("POST", "/foods", r#"{"carbohydrates_100g": 12.0}"#).await;
    assert_invalid(status, &body);

    let (status, body) = send_json("POST", "/foods", r#"{"product_name": "Rye bread"}"#).await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn create_rejects_blank_product_name() {
    let (status, body) = send_json(
        "POST",
        "/foods",
        r#"{"product_name": "  ", "carbohydrates_100g": 12.0}"#
    ).await;
    assert_invalid(status, &body);
}

#[tokio::test]
async fn update_rejects_blank_product_name() {
    let (status, body) = send_json("PUT", "/foods/1", r#"{"product_name": ""}"#).await;
    assert_invalid(status, &body);
}
