//! Catalog route handlers: products, categories and offers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::ProductId;

use crate::db::products::{Page, ProductRepository};
use crate::db::wishlist::WishlistRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Category, Offer};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    /// Category slug filter.
    pub category: Option<String>,
}

const fn default_page() -> i64 {
    1
}

const fn default_per_page() -> i64 {
    20
}

/// GET /products
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let repo = ProductRepository::new(state.pool());
    let page = Page::clamped(query.page, query.per_page);
    let products = repo.list_active(page, query.category.as_deref()).await?;

    Ok(Json(json!({
        "page": page.number,
        "per_page": page.per_page,
        "products": products,
    })))
}

/// GET /products/{id}
///
/// Returns the product together with its variants and derived discount.
/// Logged-in shoppers also get their wishlist membership for the product.
///
/// # Errors
///
/// Returns 404 for unknown or inactive products.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;
    let variants = repo.variants_of(id).await?;

    let in_wishlist = match user {
        Some(user) => {
            WishlistRepository::new(state.pool())
                .contains(user.id, id)
                .await?
        }
        None => false,
    };

    Ok(Json(json!({
        "product": product,
        "discount_percentage": product.discount_percentage(),
        "variants": variants,
        "in_wishlist": in_wishlist,
    })))
}

/// GET /categories
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let repo = ProductRepository::new(state.pool());
    Ok(Json(repo.list_categories().await?))
}

/// GET /offers
///
/// Only offers that are active and inside their start/end window.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn offers(State(state): State<AppState>) -> Result<Json<Vec<Offer>>> {
    let repo = ProductRepository::new(state.pool());
    Ok(Json(repo.list_available_offers().await?))
}
