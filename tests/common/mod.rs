//! Shared helpers for integration tests
//!
//! Each test gets its own embedded database under a tempdir and drives the
//! real router stack (auth middleware included) via `tower::ServiceExt`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront_server::core::server::build_router;
use storefront_server::db::models::{ProductCreate, UserCreate};
use storefront_server::db::repository::{CategoryRepository, ProductRepository, UserRepository};
use storefront_server::{Config, Role, ServerState};

/// Fresh server state backed by a throwaway database.
/// Keep the TempDir alive for the duration of the test.
pub async fn test_state() -> (ServerState, TempDir) {
    let tmp = TempDir::new().expect("Failed to create tempdir");
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await;
    (state, tmp)
}

/// Full router as served in production
pub fn test_app(state: &ServerState) -> Router {
    build_router(state.clone())
}

/// Seed an account directly through the repository and mint a token for it.
/// Returns ("user:xxx", token).
pub async fn seed_account(
    state: &ServerState,
    email: &str,
    password: &str,
    role: Role,
) -> (String, String) {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
            address: None,
            role: Some(role),
        })
        .await
        .expect("Failed to seed account");

    let user_id = user.id.as_ref().expect("seeded user has id").to_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, email, role)
        .expect("Failed to mint token");

    (user_id, token)
}

/// Seed a category, returns "category:xxx"
pub async fn seed_category(state: &ServerState, name: &str) -> String {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .create(storefront_server::db::models::CategoryCreate {
            name: name.to_string(),
        })
        .await
        .expect("Failed to seed category");
    category.id.expect("seeded category has id").to_string()
}

/// Seed a product, returns "product:xxx"
pub async fn seed_product(state: &ServerState, category: &str, name: &str, price: f64) -> String {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            price,
            stock_quantity: Some(100),
            image_url: None,
            is_featured: None,
        })
        .await
        .expect("Failed to seed product");
    product.id.expect("seeded product has id").to_string()
}

/// Fire one request through the router, returning (status, parsed JSON body)
pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {}", t));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
