//! Dashboard and reporting aggregates.
//!
//! Revenue counts orders whose payment has settled (`payment_status =
//! 'paid'`); order counts ignore payment state.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::RepositoryError;
use crate::models::{AdminOrder, ProductSales, StatusCount};

/// Rows returned by the monthly revenue aggregate.
#[derive(Debug, FromRow)]
struct MonthRevenue {
    month: i32,
    revenue: Decimal,
}

/// Repository for reporting queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Paid revenue per month of the given year, as a twelve-slot array
    /// (January first). Months without sales stay at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_revenue(&self, year: i32) -> Result<[Decimal; 12], RepositoryError> {
        let rows: Vec<MonthRevenue> = sqlx::query_as(
            "SELECT EXTRACT(MONTH FROM created_at)::int AS month,
                    COALESCE(SUM(total_amount + delivery_charge), 0) AS revenue
             FROM orders
             WHERE payment_status = 'paid'
               AND EXTRACT(YEAR FROM created_at)::int = $1
             GROUP BY month",
        )
        .bind(year)
        .fetch_all(self.pool)
        .await?;

        Ok(into_month_slots(&rows))
    }

    /// Number of orders per status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(&self) -> Result<Vec<StatusCount>, RepositoryError> {
        let counts = sqlx::query_as(
            "SELECT status, COUNT(*) AS count
             FROM orders
             GROUP BY status
             ORDER BY status",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    /// Paid revenue booked today.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn today_income(&self) -> Result<Decimal, RepositoryError> {
        let income: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount + delivery_charge), 0)
             FROM orders
             WHERE payment_status = 'paid'
               AND created_at::date = CURRENT_DATE",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(income)
    }

    /// The ten most recent orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_orders(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        let orders = sqlx::query_as(
            "SELECT o.id, o.user_id, u.name AS customer_name, u.email AS customer_email,
                    o.order_number, o.status, o.payment_status, o.total_amount,
                    o.delivery_charge, o.payment_method, o.created_at
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC
             LIMIT 10",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Units sold and revenue per product, cancelled orders excluded,
    /// best sellers first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales(&self) -> Result<Vec<ProductSales>, RepositoryError> {
        let sales = sqlx::query_as(
            "SELECT i.product_id,
                    MAX(i.product_name) AS product_name,
                    SUM(i.quantity)::bigint AS units_sold,
                    COALESCE(SUM(i.quantity * i.unit_price), 0) AS revenue
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             WHERE o.status <> 'cancelled'
             GROUP BY i.product_id
             ORDER BY units_sold DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }
}

/// Spread month/revenue rows into a January-first twelve-slot array.
fn into_month_slots(rows: &[MonthRevenue]) -> [Decimal; 12] {
    let mut slots = [Decimal::ZERO; 12];

    for row in rows {
        if (1..=12).contains(&row.month) {
            #[allow(clippy::cast_sign_loss)]
            let index = (row.month - 1) as usize;
            slots[index] = row.revenue;
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_slots_empty() {
        let slots = into_month_slots(&[]);
        assert!(slots.iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_month_slots_mapping() {
        let rows = vec![
            MonthRevenue {
                month: 1,
                revenue: Decimal::from(100),
            },
            MonthRevenue {
                month: 12,
                revenue: Decimal::from(50),
            },
        ];
        let slots = into_month_slots(&rows);
        assert_eq!(slots[0], Decimal::from(100));
        assert_eq!(slots[11], Decimal::from(50));
        assert!(slots[1..11].iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_month_slots_ignores_out_of_range() {
        let rows = vec![MonthRevenue {
            month: 13,
            revenue: Decimal::from(999),
        }];
        let slots = into_month_slots(&rows);
        assert!(slots.iter().all(|v| v.is_zero()));
    }
}
