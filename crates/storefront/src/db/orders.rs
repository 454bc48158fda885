//! Order repository.
//!
//! Order creation is one database transaction: insert the order, snapshot
//! the cart lines into order items, decrement stock and empty the cart.
//! Either everything lands or nothing does.

use rust_decimal::Decimal;
use sqlx::PgPool;

use gambo_core::{AddressId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, UserId};

use super::RepositoryError;
use crate::models::cart::CartLine;
use crate::models::order::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, user_id, shipping_address_id, billing_address_id, \
     order_number, status, payment_status, total_amount, delivery_charge, \
     payment_method, notes, payment_ref, created_at";

/// Everything needed to persist a new order.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub shipping_address_id: AddressId,
    pub order_number: String,
    pub total_amount: Decimal,
    pub delivery_charge: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_ref: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order from validated cart lines, then empty the cart.
    ///
    /// Stock was validated by the caller's earlier read. The decrement here
    /// is unconditional; two concurrent checkouts of the same product race,
    /// and the loser hits the `stock >= 0` check constraint instead of a
    /// validation error. No row locking or optimistic versioning (known
    /// gap, see DESIGN.md).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn create_from_cart(
        &self,
        new_order: NewOrder<'_>,
        lines: &[CartLine],
        cart_id: gambo_core::CartId,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order: Order = sqlx::query_as(&format!(
            "INSERT INTO orders
                (user_id, shipping_address_id, order_number, status, payment_status,
                 total_amount, delivery_charge, payment_method, notes, payment_ref)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.user_id)
        .bind(new_order.shipping_address_id)
        .bind(&new_order.order_number)
        .bind(OrderStatus::Pending)
        .bind(new_order.payment_status)
        .bind(new_order.total_amount)
        .bind(new_order.delivery_charge)
        .bind(new_order.payment_method)
        .bind(new_order.notes)
        .bind(new_order.payment_ref)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_items
                    (order_id, product_id, variant_id, product_name, quantity, unit_price)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.variant_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price().amount())
            .execute(&mut *tx)
            .await?;

            if let Some(variant_id) = line.variant_id {
                sqlx::query("UPDATE product_variants SET stock = stock - $1 WHERE id = $2")
                    .bind(line.quantity)
                    .bind(variant_id)
                    .execute(&mut *tx)
                    .await?;
            } else {
                sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2")
                    .bind(line.quantity)
                    .bind(line.product_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get one of the user's orders by its order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number_for_user(
        &self,
        user_id: UserId,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1 AND user_id = $2"
        ))
        .bind(order_number)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as(
            "SELECT id, order_id, product_id, variant_id, product_name, quantity, unit_price
             FROM order_items
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Cancel one of the user's orders.
    ///
    /// Only pending orders can be cancelled; any other status leaves the
    /// order untouched and reports a conflict.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist for
    /// this user, `RepositoryError::Conflict` if it is past pending.
    pub async fn cancel(&self, user_id: UserId, order_id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET status = $1
             WHERE id = $2 AND user_id = $3 AND status = $4",
        )
        .bind(OrderStatus::Cancelled)
        .bind(order_id)
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .execute(self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Distinguish "no such order" from "not cancellable".
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM orders WHERE id = $1 AND user_id = $2")
                .bind(order_id)
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        match exists {
            Some(_) => Err(RepositoryError::Conflict(
                "only pending orders can be cancelled".to_owned(),
            )),
            None => Err(RepositoryError::NotFound),
        }
    }
}
