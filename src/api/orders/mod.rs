//! Order API 模块
//!
//! 订单只有两种变更：创建和状态流转。没有删除接口 (订单是历史记录)。

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_all).post(handler::create))
        .route("/myorders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::update_status))
}
