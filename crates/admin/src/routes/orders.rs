//! Back-office order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::{OrderId, OrderStatus};

use crate::db::orders::{ORDERS_PER_PAGE, OrderAdminRepository, OrderFilter};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    /// Matches order number or customer email.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

const fn default_page() -> i64 {
    1
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// GET /orders
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let repo = OrderAdminRepository::new(state.pool());
    let page = repo
        .list(
            OrderFilter {
                search: query.search.as_deref(),
                status: query.status,
            },
            query.page,
        )
        .await?;

    let total_pages = ((page.total + ORDERS_PER_PAGE - 1) / ORDERS_PER_PAGE).max(1);

    Ok(Json(json!({
        "orders": page.orders,
        "page": page.page,
        "per_page": ORDERS_PER_PAGE,
        "total": page.total,
        "total_pages": total_pages,
    })))
}

/// GET /orders/{id}
///
/// # Errors
///
/// Returns 404 for unknown orders.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Value>> {
    let repo = OrderAdminRepository::new(state.pool());
    let order = repo
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_owned()))?;
    let items = repo.items(order_id).await?;

    Ok(Json(json!({ "order": order, "items": items })))
}

/// PUT /orders/{id}/status
///
/// # Errors
///
/// Returns 409 for an illegal lifecycle transition, 404 for unknown
/// orders.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Value>> {
    let repo = OrderAdminRepository::new(state.pool());
    let order = repo.update_status(order_id, body.status).await?;

    tracing::info!(
        order_number = %order.order_number,
        status = %order.status,
        admin_id = %admin.id,
        "order status updated"
    );

    Ok(Json(json!({ "order": order })))
}
