//! Dashboard API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", dashboard_routes())
}

fn dashboard_routes() -> Router<ServerState> {
    // 整个汇总面板仅限管理员
    Router::new()
        .route("/summary", get(handler::summary))
        .route_layer(middleware::from_fn(require_admin))
}
