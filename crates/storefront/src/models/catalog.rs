//! Catalog models: categories, products, variants and offers.
//!
//! Catalog rows are read-mostly reference data. Prices are `NUMERIC`
//! columns decoded into `rust_decimal::Decimal`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use gambo_core::{CategoryId, CategoryStatus, OfferId, OfferType, ProductId, VariantId};

/// A product category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub status: CategoryStatus,
}

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// List price before discount.
    pub original_price: Decimal,
    /// The price actually charged.
    pub selling_price: Decimal,
    pub category_id: CategoryId,
    pub is_active: bool,
    pub brand: Option<String>,
    pub stock: i32,
    pub top_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Discount percentage implied by original vs selling price,
    /// rounded to two decimal places.
    #[must_use]
    pub fn discount_percentage(&self) -> Decimal {
        if self.original_price.is_zero() {
            return Decimal::ZERO;
        }
        ((self.original_price - self.selling_price) / self.original_price
            * Decimal::from(100))
        .round_dp(2)
    }
}

/// A size/colour variant of a product with its own stock and price.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// A promotional offer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub description: String,
    pub offer_type: OfferType,
    pub discount_value: Decimal,
    pub buy_quantity: i32,
    pub get_quantity: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub min_purchase_amount: Decimal,
    /// Zero means unlimited.
    pub usage_limit: i32,
}

impl Offer {
    /// Whether the offer is live right now.
    #[must_use]
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(original: i64, selling: i64) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Basmati Rice".to_owned(),
            description: String::new(),
            original_price: Decimal::from(original),
            selling_price: Decimal::from(selling),
            category_id: CategoryId::new(1),
            is_active: true,
            brand: None,
            stock: 10,
            top_featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_discount_percentage() {
        assert_eq!(product(200, 150).discount_percentage(), Decimal::from(25));
        assert_eq!(product(0, 0).discount_percentage(), Decimal::ZERO);
    }

    #[test]
    fn test_offer_availability_window() {
        let offer = Offer {
            id: OfferId::new(1),
            title: "Eid Sale".to_owned(),
            description: String::new(),
            offer_type: OfferType::Percentage,
            discount_value: Decimal::from(10),
            buy_quantity: 1,
            get_quantity: 0,
            starts_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            is_active: true,
            min_purchase_amount: Decimal::ZERO,
            usage_limit: 0,
        };

        let inside = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(offer.is_available(inside));
        assert!(!offer.is_available(after));

        let inactive = Offer {
            is_active: false,
            ..offer
        };
        assert!(!inactive.is_available(inside));
    }
}
