//! Order Model
//!
//! 订单是历史记录：行项目价格在下单时快照，之后目录价格变化不影响已存订单。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

// =============================================================================
// Enums
// =============================================================================

/// Order status
///
/// 正常流转 Pending → Processing → Shipped → Delivered，
/// Cancelled 可从任意非终态进入。默认不强制校验 (见 `orders::status`)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// 终态订单不再流转
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    PayPal,
    Stripe,
}

// =============================================================================
// Embedded documents
// =============================================================================

/// Shipping address — all parts required at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
}

/// Order line item with the unit price captured at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record link to product (may go stale if the product is later deleted)
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i32,
    /// Price snapshot, not a live reference
    pub unit_price: f64,
    /// quantity × unit_price, rounded to cents
    pub line_total: f64,
}

// =============================================================================
// Order (主表)
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    /// Record link to the ordering user, set at creation, immutable
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub order_items: Vec<OrderItem>,
    /// Sum of line totals at creation time, never recomputed
    pub total_price: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    /// Digits only
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Cart line in a create-order request
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    /// Product id as "product:xxx"
    pub product: String,
    pub quantity: i32,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub order_items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub phone: String,
}

/// Status transition payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// API Response Types (populated views)
// =============================================================================

/// User fields attached to order listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUserSummary {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Product fields attached to order listings
///
/// 商品可能在下单后被删除：此时链接解析为空 (历史记录照常返回)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProductSummary {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub category: Option<RecordId>,
    pub price: f64,
}

/// Line item with the product link resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    #[serde(default)]
    pub product: Option<OrderProductSummary>,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Order with user and product links resolved for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub user: Option<OrderUserSummary>,
    pub order_items: Vec<OrderItemView>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}
