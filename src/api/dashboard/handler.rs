//! Dashboard API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::{
    CategoryRepository, OrderRepository, ProductRepository, UserRepository,
};
use crate::utils::AppResult;

/// Admin summary: simple counts plus delivered revenue.
///
/// 每次调用都从存储实时重算，没有缓存也就没有失效逻辑。
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    /// Sum of total_price over orders with status = Delivered
    pub total_revenue: f64,
    pub total_order: i64,
    pub total_product: i64,
    pub total_category: i64,
    pub total_user: i64,
}

/// GET /api/dashboard/summary - 管理端汇总
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<DashboardSummary>> {
    let orders = OrderRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());
    let categories = CategoryRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());

    let total_revenue = orders.total_revenue().await?;
    let total_order = orders.count().await?;
    let total_product = products.count().await?;
    let total_category = categories.count().await?;
    let total_user = users.count().await?;

    Ok(Json(DashboardSummary {
        total_revenue,
        total_order,
        total_product,
        total_category,
        total_user,
    }))
}
