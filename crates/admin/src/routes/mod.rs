//! HTTP route handlers for the admin JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//! GET  /health/ready             - Readiness check
//!
//! # Auth
//! POST /auth/login               - Admin login (is_admin accounts only)
//! POST /auth/logout              - Logout
//!
//! # Dashboard
//! GET  /dashboard                - Monthly revenue, status counts,
//!                                  today's income, recent orders
//! GET  /reports/product-sales    - Units sold and revenue per product
//!
//! # Orders
//! GET  /orders                   - Paginated listing (?page, ?search, ?status)
//! GET  /orders/{id}              - Order detail with items
//! PUT  /orders/{id}/status       - Advance the order lifecycle
//!
//! # Catalog
//! GET  /categories               - All categories
//! POST /categories               - Create category
//! PUT  /categories/{id}          - Update category
//! DELETE /categories/{id}        - Delete category (only if empty)
//! GET  /offers                   - All offers
//! POST /offers                   - Create offer
//! PUT  /offers/{id}              - Update offer
//! DELETE /offers/{id}            - Delete offer
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod offers;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/reports/product-sales", get(dashboard::product_sales))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::update_status))
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/offers", get(offers::index).post(offers::create))
        .route("/offers/{id}", put(offers::update).delete(offers::delete))
}
