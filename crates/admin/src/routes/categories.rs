//! Category administration route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::CategoryId;

use crate::db::categories::{CategoryFields, CategoryRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::state::AppState;

/// Request body for creating or updating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_owned()
}

impl CategoryRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_owned()));
        }
        if self.slug.trim().is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::BadRequest(
                "slug must be lowercase letters, digits and dashes".to_owned(),
            ));
        }
        if self.status != "active" && self.status != "inactive" {
            return Err(AppError::BadRequest(
                "status must be 'active' or 'inactive'".to_owned(),
            ));
        }

        Ok(())
    }

    fn fields(&self) -> CategoryFields<'_> {
        CategoryFields {
            name: &self.name,
            slug: &self.slug,
            status: &self.status,
        }
    }
}

/// GET /categories
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.pool());
    Ok(Json(repo.list().await?))
}

/// POST /categories
///
/// # Errors
///
/// Returns 409 for a taken slug, 400 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    body.validate()?;

    let repo = CategoryRepository::new(state.pool());
    Ok(Json(repo.create(body.fields()).await?))
}

/// PUT /categories/{id}
///
/// # Errors
///
/// Returns 404 for unknown ids, 409 for a taken slug.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    body.validate()?;

    let repo = CategoryRepository::new(state.pool());
    Ok(Json(repo.update(id, body.fields()).await?))
}

/// DELETE /categories/{id}
///
/// # Errors
///
/// Returns 409 while products still reference the category.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    let repo = CategoryRepository::new(state.pool());
    repo.delete(id).await?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, slug: &str, status: &str) -> CategoryRequest {
        CategoryRequest {
            name: name.to_owned(),
            slug: slug.to_owned(),
            status: status.to_owned(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("Olive Oil", "olive-oil", "active").validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_name() {
        assert!(request("  ", "olive-oil", "active").validate().is_err());
    }

    #[test]
    fn test_rejects_bad_slug() {
        assert!(request("Olive Oil", "Olive Oil", "active").validate().is_err());
        assert!(request("Olive Oil", "", "active").validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(request("Olive Oil", "olive-oil", "archived").validate().is_err());
    }
}
