//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type CategoryId = RecordId;

/// Category model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<CategoryId>,
    pub name: String,
    /// URL slug, generated from the name, unique
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Update category payload
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
}
