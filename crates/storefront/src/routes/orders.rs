//! Checkout and order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::{AddressId, PaymentMethod};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::checkout::{CheckoutRequest, CheckoutService};
use crate::state::AppState;

/// Request body for placing a cash-on-delivery order.
///
/// Card and gateway orders go through `/payments/...` instead, which
/// settles the payment first and then places the order.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address_id: AddressId,
    pub notes: Option<String>,
}

/// POST /checkout
///
/// # Errors
///
/// Returns 400 for an empty cart or insufficient stock, 404 for a
/// foreign address.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Json<Value>> {
    let service = CheckoutService::new(state.pool(), state.config().delivery_charge);

    let order = service
        .place_order(
            user.id,
            CheckoutRequest {
                shipping_address_id: body.shipping_address_id,
                payment_method: PaymentMethod::CashOnDelivery,
                payment_ref: None,
                notes: body.notes.as_deref(),
            },
        )
        .await?;

    tracing::info!(order_number = %order.order_number, "order placed");

    Ok(Json(json!({ "order": order, "grand_total": order.grand_total() })))
}

/// GET /orders
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(user.id).await?;

    Ok(Json(json!({ "orders": orders })))
}

/// GET /orders/{number}
///
/// # Errors
///
/// Returns 404 for another user's order or an unknown number.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(number): Path<String>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_number_for_user(user.id, &number)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_owned()))?;
    let items = repo.items(order.id).await?;

    Ok(Json(json!({
        "order": order,
        "items": items,
        "grand_total": order.grand_total(),
    })))
}

/// POST /orders/{number}/cancel
///
/// Only pending orders can be cancelled.
///
/// # Errors
///
/// Returns 404 for unknown orders, 409 for orders past pending.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(number): Path<String>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_number_for_user(user.id, &number)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_owned()))?;

    repo.cancel(user.id, order.id).await?;

    tracing::info!(order_number = %number, "order cancelled");

    Ok(Json(json!({ "ok": true })))
}
