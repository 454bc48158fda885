//! Category administration.

use sqlx::PgPool;

use gambo_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

/// Field values for creating or updating a category.
#[derive(Debug)]
pub struct CategoryFields<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub status: &'a str,
}

/// Repository for category administration.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories =
            sqlx::query_as("SELECT id, name, slug, status FROM categories ORDER BY name")
                .fetch_all(self.pool)
                .await?;

        Ok(categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, fields: CategoryFields<'_>) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as(
            "INSERT INTO categories (name, slug, status)
             VALUES ($1, $2, $3)
             RETURNING id, name, slug, status",
        )
        .bind(fields.name)
        .bind(fields.slug)
        .bind(fields.status)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(category)
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids,
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        fields: CategoryFields<'_>,
    ) -> Result<Category, RepositoryError> {
        let category: Option<Category> = sqlx::query_as(
            "UPDATE categories
             SET name = $2, slug = $3, status = $4
             WHERE id = $1
             RETURNING id, name, slug, status",
        )
        .bind(id)
        .bind(fields.name)
        .bind(fields.slug)
        .bind(fields.status)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        category.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category that has no products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still reference
    /// it, `RepositoryError::NotFound` for unknown ids.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let in_use: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM products WHERE category_id = $1 LIMIT 1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        if in_use.is_some() {
            return Err(RepositoryError::Conflict(
                "category still has products".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
