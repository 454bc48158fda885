//! Domain models backed by the storefront database.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem, CartLine, CartTotals};
pub use catalog::{Category, Offer, Product, ProductVariant};
pub use order::{Order, OrderItem};
pub use user::{CurrentUser, User};

/// Session keys used across handlers.
pub mod session_keys {
    /// The authenticated user, set on login.
    pub const CURRENT_USER: &str = "current_user";
    /// Transaction id of an in-flight hosted gateway payment.
    pub const GATEWAY_TRANSACTION: &str = "gateway_transaction";
}
