//! Cart repository.
//!
//! One cart per user, created lazily on first read. Line uniqueness on
//! (cart, product, variant) is enforced by the schema; merging quantities
//! is done by the service layer after stock validation.

use sqlx::PgPool;

use gambo_core::{CartId, CartItemId, ProductId, UserId, VariantId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem, CartLine};

const LINE_QUERY: &str = "SELECT ci.id AS item_id, ci.product_id, ci.variant_id,
            p.name AS product_name, v.name AS variant_name,
            ci.quantity,
            p.selling_price AS product_price, v.price AS variant_price,
            p.stock AS product_stock, v.stock AS variant_stock
     FROM cart_items ci
     JOIN products p ON p.id = ci.product_id
     LEFT JOIN product_variants v ON v.id = ci.variant_id
     WHERE ci.cart_id = $1
     ORDER BY ci.id";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as(
            "INSERT INTO carts (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING id, user_id, created_at",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// All lines of a cart joined with live catalog pricing and stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as(LINE_QUERY)
            .bind(cart_id)
            .fetch_all(self.pool)
            .await?;

        Ok(lines)
    }

    /// Find an existing line for the same product/variant pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        variant_id: Option<VariantId>,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as(
            "SELECT id, cart_id, product_id, variant_id, quantity
             FROM cart_items
             WHERE cart_id = $1
               AND product_id = $2
               AND variant_id IS NOT DISTINCT FROM $3",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(variant_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Get a line by id, scoped to a cart so users cannot touch foreign
    /// carts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as(
            "SELECT id, cart_id, product_id, variant_id, quantity
             FROM cart_items
             WHERE id = $1 AND cart_id = $2",
        )
        .bind(item_id)
        .bind(cart_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Insert a new line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as(
            "INSERT INTO cart_items (cart_id, product_id, variant_id, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING id, cart_id, product_id, variant_id, quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(variant_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    pub async fn set_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2")
            .bind(quantity)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a line.
    ///
    /// # Returns
    ///
    /// Returns `true` if a line was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_item(&self, item_id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total item count across the cart (sum of quantities).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, cart_id: CartId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
