//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definitions

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "main";

/// Open the embedded database and apply schema definitions
pub async fn connect(db_path: &Path) -> Result<Surreal<Db>, AppError> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    define_schema(&db).await?;

    tracing::info!(path = %db_path.display(), "Database connection established (SurrealDB RocksDB)");

    Ok(db)
}

/// Schema definitions — unique indexes backing the duplicate checks
/// done in the repositories
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS category_slug ON TABLE category FIELDS slug UNIQUE;
        DEFINE INDEX IF NOT EXISTS product_slug ON TABLE product FIELDS slug UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    Ok(())
}
