//! Order API Handlers
//!
//! 下单流程：校验购物车 → 并发解析商品 → 快照单价 → 计算总价 → 落库。
//! 所有校验都发生在任何写入之前 (没有部分成功的订单)。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use futures::future::try_join_all;
use surrealdb::RecordId;

use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate, OrderView};
use crate::db::repository::order::{NewOrder, NewOrderItem};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::orders::money::{line_total, order_total, to_f64, validate_order_item};
use crate::orders::status::is_valid_transition;
use crate::utils::validation::{MAX_ADDRESS_LEN, validate_phone, validate_required_text};
use crate::utils::{AppError, AppResult, now_millis};

/// GET /api/orders - 获取所有订单 (管理员)，按创建时间倒序
///
/// 附带下单用户与各行商品的展示信息
pub async fn list_all(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderView>>> {
    require_role(&user, &[Role::Admin])?;

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all_populated().await?;
    Ok(Json(orders))
}

/// GET /api/orders/myorders - 当前用户的订单
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderView>>> {
    let user_id: RecordId = user
        .id
        .parse()
        .map_err(|_| AppError::internal(format!("Malformed user id in token: {}", user.id)))?;

    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_user_populated(&user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 获取单个订单 (管理员或订单所有者)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id_populated(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !user.is_admin() {
        let owner_id = order
            .user
            .as_ref()
            .and_then(|u| u.id.as_ref())
            .map(|t| t.to_string());
        if owner_id.as_deref() != Some(user.id.as_str()) {
            return Err(AppError::forbidden(
                "Cannot access another user's order".to_string(),
            ));
        }
    }

    Ok(Json(order))
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    // 1. Reject an empty cart before anything else
    if payload.order_items.is_empty() {
        return Err(AppError::validation("Order items must not be empty".to_string()));
    }

    // 2. Input validation — all before any store write
    for item in &payload.order_items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity must be positive, got {}",
                item.quantity
            )));
        }
    }
    validate_phone(&payload.phone)?;
    validate_required_text(&payload.shipping_address.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.shipping_address.city, "city", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.shipping_address.state, "state", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.shipping_address.postcode, "postcode", MAX_ADDRESS_LEN)?;

    let user_id: RecordId = user
        .id
        .parse()
        .map_err(|_| AppError::internal(format!("Malformed user id in token: {}", user.id)))?;

    // 3. Resolve every product, concurrently. Any missing reference fails the
    //    whole order before a single write happens.
    let products_repo = ProductRepository::new(state.db.clone());
    let lookups = payload
        .order_items
        .iter()
        .map(|item| products_repo.find_by_id(&item.product));
    let products = try_join_all(lookups).await?;

    // 4. Snapshot unit prices and compute line totals
    let mut items = Vec::with_capacity(payload.order_items.len());
    let mut line_totals = Vec::with_capacity(payload.order_items.len());

    for (input, product) in payload.order_items.iter().zip(products) {
        let product = product
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", input.product)))?;

        let product_id = product
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Product record has no id".to_string()))?;

        validate_order_item(product.price, input.quantity)?;

        let total = line_total(product.price, input.quantity);
        line_totals.push(total);
        items.push(NewOrderItem {
            product: product_id,
            quantity: input.quantity,
            unit_price: product.price,
            line_total: to_f64(total),
        });
    }

    let total_price = order_total(line_totals);

    // 5. Persist with status Pending, bound to the authenticated caller
    let now = now_millis();
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .create(NewOrder {
            user: user_id,
            order_items: items,
            total_price,
            status: OrderStatus::Pending,
            payment_method: payload.payment_method,
            shipping_address: payload.shipping_address,
            phone: payload.phone,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(
        order_id = %order.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        user_id = %user.id,
        total_price = %order.total_price,
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /api/orders/{id}/status - 更新订单状态 (管理员)
///
/// 默认接受任意枚举状态 (与线上行为一致)；
/// 开启 `ENFORCE_STATUS_TRANSITIONS` 后按状态机校验。
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    require_role(&user, &[Role::Admin])?;

    let repo = OrderRepository::new(state.db.clone());

    if state.config.enforce_status_transitions {
        let existing = repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

        if !is_valid_transition(existing.status, payload.status) {
            return Err(AppError::validation(format!(
                "Illegal status transition: {:?} -> {:?}",
                existing.status, payload.status
            )));
        }
    }

    let order = repo.update_status(&id, payload.status).await?;

    tracing::info!(
        order_id = %id,
        status = ?order.status,
        "Order status updated"
    );

    Ok(Json(order))
}
