//! Order models.
//!
//! Orders are immutable purchase records. Item prices are copied from the
//! catalog at creation time and never re-read, so later price changes do
//! not rewrite history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use gambo_core::{
    AddressId, Money, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus,
    ProductId, UserId, VariantId,
};

/// An immutable purchase record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub shipping_address_id: AddressId,
    pub billing_address_id: Option<AddressId>,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Sum of line subtotals, excluding delivery.
    pub total_amount: Decimal,
    pub delivery_charge: Decimal,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    /// External reference from the payment provider, when paid online.
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Item total plus delivery charge.
    #[must_use]
    pub fn grand_total(&self) -> Money {
        Money::new(self.total_amount + self.delivery_charge)
    }
}

/// A line of an order with its price snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub product_name: String,
    pub quantity: i32,
    /// Price at the moment the order was created.
    pub unit_price: Decimal,
}

impl OrderItem {
    /// quantity x snapshot price.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        Money::new(self.unit_price).times(self.quantity.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grand_total() {
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            shipping_address_id: AddressId::new(1),
            billing_address_id: None,
            order_number: "GB-TEST0001".to_owned(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            total_amount: Decimal::from(200),
            delivery_charge: Decimal::from(50),
            payment_method: PaymentMethod::CashOnDelivery,
            notes: None,
            payment_ref: None,
            created_at: Utc::now(),
        };
        assert_eq!(order.grand_total().amount(), Decimal::from(250));
    }

    #[test]
    fn test_item_subtotal_uses_snapshot_price() {
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            variant_id: None,
            product_name: "Honey".to_owned(),
            quantity: 3,
            unit_price: Decimal::from(120),
        };
        assert_eq!(item.subtotal().amount(), Decimal::from(360));
    }
}
