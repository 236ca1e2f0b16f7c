//! Category API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", category_routes())
}

fn category_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{slug}",
            get(handler::get_by_slug)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
