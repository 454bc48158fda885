//! Admin-side view models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gambo_core::{
    CategoryId, OfferId, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus,
    ProductId, UserId,
};

/// The authenticated admin stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// An order joined with its customer, as listed in the back office.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub delivery_charge: Decimal,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// A snapshotted order line.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminOrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A category row, including inactive ones.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub status: String,
}

/// An offer row with its full schedule.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub description: String,
    pub offer_type: String,
    pub discount_value: Decimal,
    pub buy_quantity: Option<i32>,
    pub get_quantity: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub min_purchase_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
}

/// Per-product sales aggregate for the report endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Orders per status for the dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}
