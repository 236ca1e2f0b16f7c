//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::{now_millis, slugify};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id ("product:xxx")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Case-insensitive keyword search on the product name
    pub async fn search(&self, keyword: &str) -> RepoResult<Vec<Product>> {
        let kw = keyword.to_lowercase();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE string::lowercase(name) CONTAINS $kw ORDER BY name",
            )
            .bind(("kw", kw))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    /// Check whether a product with this name or slug already exists
    async fn exists_by_name_or_slug(&self, name: &str, slug: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE name = $name OR slug = $slug LIMIT 1")
            .bind(("name", name.to_string()))
            .bind(("slug", slug.to_string()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(!products.is_empty())
    }

    /// Create a new product (slug generated from the name)
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Product name must contain at least one alphanumeric character".to_string(),
            ));
        }

        // Check duplicate name or slug
        if self.exists_by_name_or_slug(&data.name, &slug).await? {
            return Err(RepoError::Duplicate(format!(
                "Product with the same name or slug already exists: '{}'",
                data.name
            )));
        }

        let category: RecordId = data.category.parse().map_err(|_| {
            RepoError::Validation(format!("Invalid category ID format: {}", data.category))
        })?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    slug = $slug,
                    description = $description,
                    category = $category,
                    price = $price,
                    stock_quantity = $stock_quantity,
                    image_url = $image_url,
                    is_featured = $is_featured,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", slug))
            .bind(("description", data.description.unwrap_or_default()))
            .bind(("category", category))
            .bind(("price", data.price))
            .bind(("stock_quantity", data.stock_quantity.unwrap_or(0)))
            .bind(("image_url", data.image_url.unwrap_or_default()))
            .bind(("is_featured", data.is_featured.unwrap_or(false)))
            .bind(("now", now))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product by slug (slug itself is stable)
    pub async fn update_by_slug(&self, slug: &str, data: ProductUpdate) -> RepoResult<Product> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.exists_by_name_or_slug(new_name, "").await?
        {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                new_name
            )));
        }

        let category: Option<RecordId> = match &data.category {
            Some(c) => Some(c.parse().map_err(|_| {
                RepoError::Validation(format!("Invalid category ID format: {}", c))
            })?),
            None => None,
        };

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Product record has no id".to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    description = $description OR description,
                    category = $category OR category,
                    price = IF $has_price THEN $price ELSE price END,
                    stock_quantity = IF $has_stock THEN $stock_quantity ELSE stock_quantity END,
                    image_url = $image_url OR image_url,
                    is_featured = IF $has_featured THEN $is_featured ELSE is_featured END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("category", category))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("has_stock", data.stock_quantity.is_some()))
            .bind(("stock_quantity", data.stock_quantity))
            .bind(("image_url", data.image_url))
            .bind(("has_featured", data.is_featured.is_some()))
            .bind(("is_featured", data.is_featured))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Product>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))
    }

    /// Delete a product by slug
    ///
    /// Orders referencing the product keep their snapshot data; the stale
    /// link is accepted (orders are historical records, not live views).
    pub async fn delete_by_slug(&self, slug: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product '{}' not found", slug)))?;

        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Product record has no id".to_string()))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;

        Ok(true)
    }

    /// Count all products (dashboard)
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM product GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
