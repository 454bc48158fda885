//! Wishlist route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::ProductId;

use crate::db::products::ProductRepository;
use crate::db::wishlist::{WishlistEntry, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Request body for toggling a product.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product_id: ProductId,
}

/// GET /account/wishlist
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<WishlistEntry>>> {
    let repo = WishlistRepository::new(state.pool());
    Ok(Json(repo.list_for_user(user.id).await?))
}

/// POST /account/wishlist/toggle
///
/// Adds the product if absent, removes it if present.
///
/// # Errors
///
/// Returns 404 for unknown or inactive products.
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool());
    products
        .get_active(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    let repo = WishlistRepository::new(state.pool());
    let in_wishlist = repo.toggle(user.id, body.product_id).await?;
    let count = repo.count_for_user(user.id).await?;

    Ok(Json(json!({ "in_wishlist": in_wishlist, "count": count })))
}
