//! Checkout service.
//!
//! Turns a validated cart into an order: checks the shipping address
//! belongs to the shopper, re-reads the cart and re-validates stock,
//! computes totals, generates an order number and hands everything to the
//! order repository in one transaction.

use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;

use gambo_core::{AddressId, Money, PaymentMethod, PaymentStatus, UserId};

use crate::db::addresses::AddressRepository;
use crate::db::carts::CartRepository;
use crate::db::orders::{NewOrder, OrderRepository};
use crate::error::AppError;
use crate::models::cart::{CartLine, CartTotals};
use crate::models::order::Order;

/// Order numbers look like `GB-7F3K9Q2M`.
const ORDER_NUMBER_PREFIX: &str = "GB-";
const ORDER_NUMBER_LENGTH: usize = 8;
const ORDER_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Input to [`CheckoutService::place_order`].
#[derive(Debug)]
pub struct CheckoutRequest<'a> {
    pub shipping_address_id: AddressId,
    pub payment_method: PaymentMethod,
    /// Provider reference when the payment settled before checkout
    /// (card intent id or gateway transaction id).
    pub payment_ref: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    delivery_charge: Money,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, delivery_charge: Money) -> Self {
        Self {
            pool,
            delivery_charge,
        }
    }

    /// Place an order from the user's current cart.
    ///
    /// Stock is validated against the cart lines read here; the decrement
    /// itself happens later in the order transaction without re-checking,
    /// so a concurrent checkout can still win the same stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an empty cart or insufficient
    /// stock, `AppError::NotFound` if the address is not the user's.
    #[instrument(skip(self, request), fields(user_id = %user_id, method = ?request.payment_method))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        request: CheckoutRequest<'_>,
    ) -> Result<Order, AppError> {
        let addresses = AddressRepository::new(self.pool);
        let carts = CartRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        addresses
            .get_owned(user_id, request.shipping_address_id)
            .await?
            .ok_or_else(|| AppError::NotFound("shipping address not found".to_owned()))?;

        let cart = carts.get_or_create(user_id).await?;
        let lines = carts.lines(cart.id).await?;

        if lines.is_empty() {
            return Err(AppError::BadRequest("cart is empty".to_owned()));
        }

        validate_stock(&lines)?;

        let totals = CartTotals::compute(&lines, self.delivery_charge);
        let order_number = generate_order_number();

        let payment_status = match request.payment_method {
            PaymentMethod::CashOnDelivery => PaymentStatus::Pending,
            // Card and gateway orders reach checkout only after the
            // provider confirmed the charge.
            PaymentMethod::Card | PaymentMethod::Gateway => PaymentStatus::Paid,
        };

        let order = orders
            .create_from_cart(
                NewOrder {
                    user_id,
                    shipping_address_id: request.shipping_address_id,
                    order_number,
                    total_amount: totals.subtotal.amount(),
                    delivery_charge: self.delivery_charge.amount(),
                    payment_method: request.payment_method,
                    payment_status,
                    payment_ref: request.payment_ref,
                    notes: request.notes,
                },
                &lines,
                cart.id,
            )
            .await?;

        Ok(order)
    }

    /// Totals the shopper would pay for their current cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the cart cannot be read.
    pub async fn preview_totals(&self, user_id: UserId) -> Result<CartTotals, AppError> {
        let carts = CartRepository::new(self.pool);
        let cart = carts.get_or_create(user_id).await?;
        let lines = carts.lines(cart.id).await?;

        Ok(CartTotals::compute(&lines, self.delivery_charge))
    }
}

/// Reject the checkout if any line asks for more than the available pool.
fn validate_stock(lines: &[CartLine]) -> Result<(), AppError> {
    for line in lines {
        if line.quantity > line.available_stock() {
            return Err(AppError::BadRequest(format!(
                "insufficient stock for '{}': requested {}, available {}",
                line.product_name,
                line.quantity,
                line.available_stock()
            )));
        }
    }

    Ok(())
}

/// Generate an order number: `GB-` followed by eight random uppercase
/// alphanumerics.
fn generate_order_number() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_NUMBER_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ORDER_NUMBER_ALPHABET.len());
            ORDER_NUMBER_ALPHABET[idx] as char
        })
        .collect();

    format!("{ORDER_NUMBER_PREFIX}{suffix}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use gambo_core::{CartItemId, ProductId};

    use super::*;

    fn line(quantity: i32, stock: i32) -> CartLine {
        CartLine {
            item_id: CartItemId::new(1),
            product_id: ProductId::new(1),
            variant_id: None,
            product_name: "Widget".to_owned(),
            variant_name: None,
            quantity,
            product_price: Decimal::from(100),
            variant_price: None,
            product_stock: stock,
            variant_stock: None,
        }
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert_eq!(number.len(), ORDER_NUMBER_PREFIX.len() + ORDER_NUMBER_LENGTH);
        assert!(number.starts_with(ORDER_NUMBER_PREFIX));
        let suffix = &number[ORDER_NUMBER_PREFIX.len()..];
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_order_numbers_vary() {
        let a = generate_order_number();
        let b = generate_order_number();
        // Eight alphanumerics; a collision here means the RNG is broken.
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_stock_ok() {
        assert!(validate_stock(&[line(2, 5)]).is_ok());
    }

    #[test]
    fn test_validate_stock_exact() {
        assert!(validate_stock(&[line(5, 5)]).is_ok());
    }

    #[test]
    fn test_validate_stock_insufficient() {
        let result = validate_stock(&[line(6, 5)]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
