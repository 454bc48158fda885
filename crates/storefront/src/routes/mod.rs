//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /products                    - Product listing (paginated, ?category=slug)
//! GET  /products/{id}               - Product detail with variants
//! GET  /categories                  - Active categories
//! GET  /offers                      - Offers currently inside their window
//!
//! # Auth
//! POST /auth/register               - Register with email/password
//! POST /auth/login                  - Login
//! POST /auth/logout                 - Logout
//! GET  /auth/me                     - Current user
//!
//! # Cart (requires auth)
//! GET  /cart                        - Cart lines and totals
//! POST /cart/items                  - Add a product (merges quantities)
//! PUT  /cart/items/{id}             - Set line quantity
//! DELETE /cart/items/{id}           - Remove a line
//! GET  /cart/count                  - Total item count badge
//!
//! # Account (requires auth)
//! GET  /account/addresses           - Address list, default first
//! POST /account/addresses           - Create address
//! PUT  /account/addresses/{id}      - Update address
//! DELETE /account/addresses/{id}    - Delete address (guarded)
//! GET  /account/wishlist            - Wishlist entries
//! POST /account/wishlist/toggle     - Toggle a product in/out
//!
//! # Orders (requires auth)
//! POST /checkout                    - Place an order from the cart
//! GET  /orders                      - Order history
//! GET  /orders/{number}             - Order detail with items
//! POST /orders/{number}/cancel      - Cancel a pending order
//!
//! # Payments (requires auth)
//! POST /payments/card/intent        - Create a card payment intent
//! POST /payments/card/confirm       - Confirm the intent and place the order
//! POST /payments/gateway/start      - Start a hosted gateway session
//! POST /payments/gateway/callback   - Verify the callback and place the order
//! ```

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod payments;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/offers", get(products::offers))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/count", get(cart::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/addresses",
            get(addresses::index).post(addresses::create),
        )
        .route(
            "/addresses/{id}",
            put(addresses::update).delete(addresses::delete),
        )
        .route("/wishlist", get(wishlist::index))
        .route("/wishlist/toggle", post(wishlist::toggle))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{number}", get(orders::show))
        .route("/{number}/cancel", post(orders::cancel))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/card/intent", post(payments::create_card_intent))
        .route("/card/confirm", post(payments::confirm_card))
        .route("/gateway/start", post(payments::start_gateway))
        .route("/gateway/callback", post(payments::gateway_callback))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/auth", auth_routes())
        .nest("/cart", cart_routes())
        .nest("/account", account_routes())
        .route("/checkout", post(orders::checkout))
        .nest("/orders", order_routes())
        .nest("/payments", payment_routes())
}
