//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy | degraded)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 数据库检查 (ok | error)
    database: &'static str,
}

/// 基础健康检查，附带数据库连通性探测
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = match state.db.query("RETURN 1").await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check database probe failed");
            "error"
        }
    };

    Json(HealthResponse {
        status: if database == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
