//! Back-office order management.
//!
//! Listing is paginated ten per page with a free-text search over order
//! number and customer email plus an optional status filter. Status
//! updates are validated against the order lifecycle before touching the
//! row.

use sqlx::PgPool;

use gambo_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{AdminOrder, AdminOrderItem};

/// Orders shown per page in the back office.
pub const ORDERS_PER_PAGE: i64 = 10;

const ORDER_COLUMNS: &str = "o.id, o.user_id, u.name AS customer_name, u.email AS customer_email, \
     o.order_number, o.status, o.payment_status, o.total_amount, \
     o.delivery_charge, o.payment_method, o.created_at";

/// Filters for the order listing.
#[derive(Debug, Default)]
pub struct OrderFilter<'a> {
    /// Matches order number or customer email, case-insensitive.
    pub search: Option<&'a str>,
    pub status: Option<OrderStatus>,
}

/// A page of orders plus the total row count for pagination.
#[derive(Debug)]
pub struct OrderPage {
    pub orders: Vec<AdminOrder>,
    pub total: i64,
    pub page: i64,
}

/// Repository for back-office order operations.
pub struct OrderAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderAdminRepository<'a> {
    /// Create a new order admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: OrderFilter<'_>,
        page: i64,
    ) -> Result<OrderPage, RepositoryError> {
        let page = page.max(1);
        let pattern = filter.search.map(|s| format!("%{s}%"));

        let orders = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             JOIN users u ON u.id = o.user_id
             WHERE ($1::text IS NULL OR o.order_number ILIKE $1 OR u.email ILIKE $1)
               AND ($2::text IS NULL OR o.status = $2)
             ORDER BY o.created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(pattern.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .bind(ORDERS_PER_PAGE)
        .bind((page - 1) * ORDERS_PER_PAGE)
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM orders o
             JOIN users u ON u.id = o.user_id
             WHERE ($1::text IS NULL OR o.order_number ILIKE $1 OR u.email ILIKE $1)
               AND ($2::text IS NULL OR o.status = $2)",
        )
        .bind(pattern.as_deref())
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_one(self.pool)
        .await?;

        Ok(OrderPage {
            orders,
            total,
            page,
        })
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, order_id: OrderId) -> Result<Option<AdminOrder>, RepositoryError> {
        let order = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             JOIN users u ON u.id = o.user_id
             WHERE o.id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<AdminOrderItem>, RepositoryError> {
        let items = sqlx::query_as(
            "SELECT id, product_id, product_name, quantity, unit_price
             FROM order_items
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Move an order to a new status.
    ///
    /// The transition is validated against the order lifecycle; a
    /// delivered order additionally has its payment marked paid (cash on
    /// delivery settles on the doorstep).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown orders and
    /// `RepositoryError::Conflict` for an illegal transition.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<AdminOrder, RepositoryError> {
        let order = self.get(order_id).await?.ok_or(RepositoryError::NotFound)?;

        if !order.status.can_transition_to(new_status) {
            return Err(RepositoryError::Conflict(format!(
                "cannot move order from '{}' to '{new_status}'",
                order.status
            )));
        }

        if new_status == OrderStatus::Delivered {
            sqlx::query("UPDATE orders SET status = $1, payment_status = 'paid' WHERE id = $2")
                .bind(new_status)
                .bind(order_id)
                .execute(self.pool)
                .await?;
        } else {
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                .bind(new_status)
                .bind(order_id)
                .execute(self.pool)
                .await?;
        }

        self.get(order_id).await?.ok_or(RepositoryError::NotFound)
    }
}
