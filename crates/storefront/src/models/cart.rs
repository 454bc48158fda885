//! Cart models and total computation.
//!
//! A cart is a per-user transient basket. Lines reference live catalog
//! rows; nothing is priced until checkout snapshots it. Totals are
//! computed here, in one place, so the handlers and the checkout service
//! cannot disagree about the math.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use gambo_core::{CartId, CartItemId, Money, ProductId, UserId, VariantId};

/// A per-user cart. Created lazily on first read.
#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A raw cart line as stored.
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub quantity: i32,
}

/// A cart line joined with the catalog data needed to price and
/// stock-check it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
    pub item_id: CartItemId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub product_name: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
    /// Product selling price.
    pub product_price: Decimal,
    /// Variant price, when a variant is selected.
    pub variant_price: Option<Decimal>,
    pub product_stock: i32,
    pub variant_stock: Option<i32>,
}

impl CartLine {
    /// The price charged per unit: the variant price when a variant is
    /// selected, otherwise the product selling price.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        Money::new(self.variant_price.unwrap_or(self.product_price))
    }

    /// The stock pool this line draws from.
    #[must_use]
    pub fn available_stock(&self) -> i32 {
        self.variant_stock.unwrap_or(self.product_stock)
    }

    /// quantity x unit price.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.unit_price().times(self.quantity.unsigned_abs())
    }
}

/// Aggregate cart totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartTotals {
    pub total_items: i64,
    pub subtotal: Money,
    pub delivery_charge: Money,
    pub total: Money,
}

impl CartTotals {
    /// Compute totals over a set of lines plus the configured delivery
    /// charge. An empty cart still reports the charge-free zero total.
    #[must_use]
    pub fn compute(lines: &[CartLine], delivery_charge: Money) -> Self {
        let total_items = lines.iter().map(|l| i64::from(l.quantity)).sum();
        let subtotal: Money = lines.iter().map(CartLine::subtotal).sum();
        let total = subtotal + delivery_charge;

        Self {
            total_items,
            subtotal,
            delivery_charge,
            total,
        }
    }
}
