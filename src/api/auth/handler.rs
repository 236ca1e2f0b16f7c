//! Authentication Handlers
//!
//! Handles registration, login, and the password flows

use std::time::Duration;

use axum::{Json, extract::State};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::{RepoError, UserRepository};
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_password, validate_required_text,
};
use crate::utils::{AppError, now_millis};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Reset tokens are valid for 10 minutes
const RESET_TOKEN_TTL_MS: i64 = 10 * 60 * 1000;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn message(msg: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: msg.into(),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register - 注册新用户
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_required_text(&req.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    if req.password != req.confirm_password {
        return Err(AppError::validation(
            "Password and confirm password do not match".to_string(),
        ));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(UserCreate {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: None,
            address: None,
            role: None,
        })
        .await
        .map_err(|e| match e {
            // Keep the original 400 contract for duplicate registration
            RepoError::Duplicate(_) => AppError::validation("Email already exists".to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(), "User registered");

    Ok(message("User successfully registered"))
}

/// POST /api/auth/login - 登录并签发令牌
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active() {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!("WARN", "login_failed", email = req.email.clone());
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!("WARN", "login_failed", email = req.email.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    // Generate JWT token
    let jwt_service = state.get_jwt_service();
    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = jwt_service
        .generate_token(&user_id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<User>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    Ok(Json(record))
}

/// POST /api/auth/forgot-password - 发起密码重置
///
/// 无论邮箱是否存在都返回同一应答，避免账号枚举。
/// 邮件投递是外部协作方：这里只生成令牌并记录日志。
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_email(&req.email)?;

    let repo = UserRepository::new(state.db.clone());

    if let Some(user) = repo.find_by_email(&req.email).await? {
        if let Some(user_id) = user.id.as_ref() {
            let token = generate_reset_token()?;
            let digest = digest_reset_token(&token);
            let expires_at = now_millis() + RESET_TOKEN_TTL_MS;

            repo.set_reset_token(user_id, &digest, expires_at).await?;

            security_log!("INFO", "password_reset_requested", email = req.email.clone());
            // Handed to the mail collaborator; surfaced in logs for development
            tracing::debug!(email = %req.email, token = %token, "Password reset token issued");
        }
    }

    Ok(message(
        "If that email address is registered, a reset link has been sent",
    ))
}

/// POST /api/auth/reset-password - 使用令牌重置密码
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&req.password)?;

    let repo = UserRepository::new(state.db.clone());
    let digest = digest_reset_token(&req.token);

    let user = repo
        .find_by_valid_reset_token(&digest)
        .await?
        .ok_or_else(|| AppError::invalid("Reset token is invalid or has expired".to_string()))?;

    let user_id = user
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record has no id".to_string()))?;

    let hash_pass = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    repo.update_password(user_id, &hash_pass).await?;

    security_log!("INFO", "password_reset_completed", email = user.email.clone());

    Ok(message("Password successfully reset"))
}

/// POST /api/auth/change-password - 修改当前用户密码
pub async fn change_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&req.new_password)?;

    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

    let password_valid = record
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        security_log!("WARN", "change_password_failed", user_id = user.id.clone());
        return Err(AppError::invalid("Current password is incorrect".to_string()));
    }

    let user_id = record
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("User record has no id".to_string()))?;

    let hash_pass = User::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    repo.update_password(user_id, &hash_pass).await?;

    Ok(message("Password successfully changed"))
}

// ============================================================================
// Reset token helpers
// ============================================================================

/// Generate a random reset token (hex-encoded, shared with the user)
fn generate_reset_token() -> Result<String, AppError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("Failed to generate reset token".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Only the SHA-256 digest of a token is stored
fn digest_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
