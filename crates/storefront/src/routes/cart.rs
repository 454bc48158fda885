//! Cart route handlers.
//!
//! Adding a product that is already in the cart merges quantities rather
//! than creating a second line; every mutation re-checks the merged
//! quantity against the available stock pool.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::{CartItemId, ProductId, VariantId};

use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartTotals;
use crate::state::AppState;

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Request body for changing a line's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// GET /cart
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;
    let lines = carts.lines(cart.id).await?;
    let totals = CartTotals::compute(&lines, state.config().delivery_charge);

    Ok(Json(json!({ "items": lines, "totals": totals })))
}

/// POST /cart/items
///
/// # Errors
///
/// Returns 400 for a non-positive quantity or insufficient stock, 404 for
/// unknown products or variants.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Value>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_owned()));
    }

    let products = ProductRepository::new(state.pool());
    let product = products
        .get_active(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    // The stock pool the line draws from: variant stock when a variant is
    // selected, product stock otherwise.
    let available = match body.variant_id {
        Some(variant_id) => {
            let variant = products
                .get_variant(body.product_id, variant_id)
                .await?
                .ok_or_else(|| AppError::NotFound("variant not found".to_owned()))?;
            variant.stock
        }
        None => product.stock,
    };

    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;

    let existing = carts
        .find_item(cart.id, body.product_id, body.variant_id)
        .await?;
    let merged = existing.as_ref().map_or(0, |i| i.quantity) + body.quantity;

    if merged > available {
        return Err(AppError::BadRequest(format!(
            "insufficient stock: requested {merged}, available {available}"
        )));
    }

    match existing {
        Some(item) => carts.set_quantity(item.id, merged).await?,
        None => {
            carts
                .insert_item(cart.id, body.product_id, body.variant_id, body.quantity)
                .await?;
        }
    }

    let count = carts.item_count(cart.id).await?;
    Ok(Json(json!({ "ok": true, "count": count })))
}

/// PUT /cart/items/{id}
///
/// A quantity below one removes the line.
///
/// # Errors
///
/// Returns 404 for lines outside the user's cart, 400 for a quantity
/// above the available stock.
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Value>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;

    // Scoping to the cart keeps users out of each other's lines.
    let item = carts
        .get_item(cart.id, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart item not found".to_owned()))?;

    if body.quantity < 1 {
        carts.delete_item(item.id).await?;

        let lines = carts.lines(cart.id).await?;
        let totals = CartTotals::compute(&lines, state.config().delivery_charge);
        return Ok(Json(json!({ "items": lines, "totals": totals })));
    }

    let lines = carts.lines(cart.id).await?;
    let available = lines
        .iter()
        .find(|l| l.item_id == item.id)
        .map_or(0, crate::models::CartLine::available_stock);

    if body.quantity > available {
        return Err(AppError::BadRequest(format!(
            "insufficient stock: requested {}, available {available}",
            body.quantity
        )));
    }

    carts.set_quantity(item.id, body.quantity).await?;

    let lines = carts.lines(cart.id).await?;
    let totals = CartTotals::compute(&lines, state.config().delivery_charge);
    Ok(Json(json!({ "items": lines, "totals": totals })))
}

/// DELETE /cart/items/{id}
///
/// # Errors
///
/// Returns 404 for lines outside the user's cart.
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Result<Json<Value>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;

    let item = carts
        .get_item(cart.id, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cart item not found".to_owned()))?;

    carts.delete_item(item.id).await?;

    let count = carts.item_count(cart.id).await?;
    Ok(Json(json!({ "ok": true, "count": count })))
}

/// GET /cart/count
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn count(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;
    let count = carts.item_count(cart.id).await?;

    Ok(Json(json!({ "count": count })))
}
