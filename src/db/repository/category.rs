//! Category Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::{now_millis, slugify};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Check whether a category with this name or slug already exists
    async fn exists_by_name_or_slug(&self, name: &str, slug: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name OR slug = $slug LIMIT 1")
            .bind(("name", name.to_string()))
            .bind(("slug", slug.to_string()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(!categories.is_empty())
    }

    /// Create a new category (slug generated from the name)
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Category name must contain at least one alphanumeric character".to_string(),
            ));
        }

        // Check duplicate name or slug
        if self.exists_by_name_or_slug(&data.name, &slug).await? {
            return Err(RepoError::Duplicate(format!(
                "Category with the same name or slug already exists: '{}'",
                data.name
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE category SET
                    name = $name,
                    slug = $slug,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", slug))
            .bind(("now", now))
            .await?;

        let created: Option<Category> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category by slug
    ///
    /// The slug itself is stable: renaming does not re-slugify, so existing
    /// links keep working.
    pub async fn update_by_slug(&self, slug: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category '{}' not found", slug)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.exists_by_name_or_slug(new_name, "").await?
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Category record has no id".to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("now", now_millis()))
            .await?;

        result
            .take::<Option<Category>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Delete a category by slug
    pub async fn delete_by_slug(&self, slug: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category '{}' not found", slug)))?;

        let thing = existing
            .id
            .ok_or_else(|| RepoError::Database("Category record has no id".to_string()))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;

        Ok(true)
    }

    /// Count all categories (dashboard)
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM category GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
