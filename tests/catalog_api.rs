//! Catalog (category/product) integration tests

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;
use storefront_server::Role;

#[tokio::test]
async fn catalog_reads_are_public_writes_are_admin() {
    let (state, _tmp) = test_state().await;
    let app = test_app(&state);

    let (_uid, user_token) = seed_account(&state, "user@example.com", "password123", Role::User).await;
    let (_aid, admin_token) =
        seed_account(&state, "admin@example.com", "password123", Role::Admin).await;

    // Anonymous reads work
    let (status, body) = request(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = request(&app, "GET", "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Anonymous write is rejected by the auth middleware
    let (status, _) = request(
        &app,
        "POST",
        "/api/categories",
        None,
        Some(json!({ "name": "Stationery" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Authenticated non-admin write is forbidden
    let (status, _) = request(
        &app,
        "POST",
        "/api/categories",
        Some(&user_token),
        Some(json!({ "name": "Stationery" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin write succeeds and generates the slug
    let (status, category) = request(
        &app,
        "POST",
        "/api/categories",
        Some(&admin_token),
        Some(json!({ "name": "Office Supplies" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], json!("office-supplies"));
}

#[tokio::test]
async fn category_crud_by_slug() {
    let (state, _tmp) = test_state().await;
    let app = test_app(&state);

    let (_aid, admin_token) =
        seed_account(&state, "admin@example.com", "password123", Role::Admin).await;

    let (_, category) = request(
        &app,
        "POST",
        "/api/categories",
        Some(&admin_token),
        Some(json!({ "name": "Office Supplies" })),
    )
    .await;
    let slug = category["slug"].as_str().unwrap().to_string();

    // Duplicate name conflicts
    let (status, _) = request(
        &app,
        "POST",
        "/api/categories",
        Some(&admin_token),
        Some(json!({ "name": "Office Supplies" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Public read by slug
    let (status, fetched) =
        request(&app, "GET", &format!("/api/categories/{}", slug), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], json!("Office Supplies"));

    // Rename keeps the slug stable
    let (status, updated) = request(
        &app,
        "PATCH",
        &format!("/api/categories/{}", slug),
        Some(&admin_token),
        Some(json!({ "name": "Desk Supplies" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Desk Supplies"));
    assert_eq!(updated["slug"], json!(slug));

    // Delete, then 404s
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/categories/{}", slug),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", &format!("/api/categories/{}", slug), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/categories/{}", slug),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_crud_and_search() {
    let (state, _tmp) = test_state().await;
    let app = test_app(&state);

    let (_aid, admin_token) =
        seed_account(&state, "admin@example.com", "password123", Role::Admin).await;
    let category = seed_category(&state, "Stationery").await;

    let (status, product) = request(
        &app,
        "POST",
        "/api/products",
        Some(&admin_token),
        Some(json!({
            "name": "Wireless Mouse",
            "description": "A mouse without wires",
            "category": category,
            "price": 29.95,
            "stock_quantity": 10,
            "image_url": "https://cdn.example.com/mouse.jpg"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["slug"], json!("wireless-mouse"));
    assert_eq!(product["category"], json!(category));

    // Duplicate name conflicts
    let (status, _) = request(
        &app,
        "POST",
        "/api/products",
        Some(&admin_token),
        Some(json!({ "name": "Wireless Mouse", "category": category, "price": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Negative price rejected
    let (status, _) = request(
        &app,
        "POST",
        "/api/products",
        Some(&admin_token),
        Some(json!({ "name": "Bad Price", "category": category, "price": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Case-insensitive keyword search
    seed_product(&state, &category, "Mechanical Keyboard", 89.0).await;
    let (status, results) =
        request(&app, "GET", "/api/products/search?keyword=MOUSE", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], json!("Wireless Mouse"));

    // Update price by slug
    let (status, updated) = request(
        &app,
        "PATCH",
        "/api/products/wireless-mouse",
        Some(&admin_token),
        Some(json!({ "price": 24.95 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], json!(24.95));
    assert_eq!(updated["name"], json!("Wireless Mouse"));

    // Delete, then 404
    let (status, _) = request(
        &app,
        "DELETE",
        "/api/products/wireless-mouse",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "GET", "/api/products/wireless-mouse", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_listing_is_admin_gated() {
    let (state, _tmp) = test_state().await;
    let app = test_app(&state);

    let (user_id, user_token) =
        seed_account(&state, "user@example.com", "password123", Role::User).await;
    let (_aid, admin_token) =
        seed_account(&state, "admin@example.com", "password123", Role::Admin).await;

    let (status, _) = request(&app, "GET", "/api/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = request(&app, "GET", "/api/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    // Newest first: the admin was seeded after the user
    assert_eq!(users[0]["email"], json!("admin@example.com"));
    assert!(users[0].get("hash_pass").is_none());

    // A user can read their own record but nobody else's
    let own_path = format!("/api/users/{}", user_id);
    let (status, me) = request(&app, "GET", &own_path, Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], json!("user@example.com"));

    let (status, _) = request(&app, "GET", "/api/users/user:someoneelse", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
