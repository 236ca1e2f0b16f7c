//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    /// URL slug, generated from the name, unique
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Record link to category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// Current unit price; orders snapshot this value at creation time
    pub price: f64,
    /// Stock on hand. Never mutated by the order flow (no reservation).
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category id as "category:xxx"
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}
