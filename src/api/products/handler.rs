//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::orders::money;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

/// GET /api/products - 获取所有商品 (公开)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(Json(products))
}

/// GET /api/products/search?keyword= - 按关键词搜索商品 (公开)
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = if query.keyword.trim().is_empty() {
        repo.find_all().await?
    } else {
        repo.search(query.keyword.trim()).await?
    };
    Ok(Json(products))
}

/// GET /api/products/{slug} - 获取单个商品 (公开)
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", slug)))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_role(&user, &[Role::Admin])?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_price(payload.price)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/products/{slug} - 更新商品 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    require_role(&user, &[Role::Admin])?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update_by_slug(&slug, payload).await?;

    Ok(Json(product))
}

/// DELETE /api/products/{slug} - 删除商品 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    require_role(&user, &[Role::Admin])?;

    let repo = ProductRepository::new(state.db.clone());
    repo.delete_by_slug(&slug).await?;

    Ok(Json(
        serde_json::json!({ "message": "Product successfully deleted" }),
    ))
}

/// Catalog prices obey the same bounds as order pricing
fn validate_price(price: f64) -> Result<(), AppError> {
    money::validate_order_item(price, 1)
}
