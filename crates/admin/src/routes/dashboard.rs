//! Dashboard and reporting route handlers.

use axum::{Json, extract::State};
use chrono::{Datelike, Utc};
use serde_json::{Value, json};

use crate::db::reports::ReportRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ProductSales;
use crate::state::AppState;

/// GET /dashboard
///
/// Monthly revenue for the current year (January-first array), order
/// counts per status, today's settled income and the ten most recent
/// orders.
///
/// # Errors
///
/// Returns 500 if any aggregate query fails.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let reports = ReportRepository::new(state.pool());
    let year = Utc::now().year();

    let monthly_revenue = reports.monthly_revenue(year).await?;
    let status_counts = reports.status_counts().await?;
    let today_income = reports.today_income().await?;
    let recent_orders = reports.recent_orders().await?;

    Ok(Json(json!({
        "year": year,
        "monthly_revenue": monthly_revenue,
        "status_counts": status_counts,
        "today_income": today_income,
        "recent_orders": recent_orders,
    })))
}

/// GET /reports/product-sales
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn product_sales(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<ProductSales>>> {
    let reports = ReportRepository::new(state.pool());
    Ok(Json(reports.product_sales().await?))
}
