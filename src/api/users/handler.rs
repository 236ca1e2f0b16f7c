//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/users - 获取所有用户 (管理员)，按创建时间倒序
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    require_role(&user, &[Role::Admin])?;

    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/{id} - 获取单个用户 (管理员或本人)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    if !user.is_admin() && user.id != id {
        return Err(AppError::forbidden(
            "Cannot access another user's account".to_string(),
        ));
    }

    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(record))
}
