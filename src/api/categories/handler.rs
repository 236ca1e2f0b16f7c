//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/categories - 获取所有分类 (公开)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{slug} - 获取单个分类 (公开)
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category '{}' not found", slug)))?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    require_role(&user, &[Role::Admin])?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /api/categories/{slug} - 更新分类 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    require_role(&user, &[Role::Admin])?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.update_by_slug(&slug, payload).await?;

    Ok(Json(category))
}

/// DELETE /api/categories/{slug} - 删除分类 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    require_role(&user, &[Role::Admin])?;

    let repo = CategoryRepository::new(state.db.clone());
    repo.delete_by_slug(&slug).await?;

    Ok(Json(
        serde_json::json!({ "message": "Category successfully deleted" }),
    ))
}
