//! Offer administration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use gambo_core::OfferId;

use super::RepositoryError;
use crate::models::Offer;

const OFFER_COLUMNS: &str = "id, title, description, offer_type, discount_value, \
     buy_quantity, get_quantity, starts_at, ends_at, is_active, \
     min_purchase_amount, usage_limit";

/// Field values for creating or updating an offer.
#[derive(Debug)]
pub struct OfferFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub offer_type: &'a str,
    pub discount_value: Decimal,
    pub buy_quantity: Option<i32>,
    pub get_quantity: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub min_purchase_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
}

/// Repository for offer administration.
pub struct OfferRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OfferRepository<'a> {
    /// Create a new offer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All offers, newest schedule first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        let offers = sqlx::query_as(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers ORDER BY starts_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(offers)
    }

    /// Create an offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, fields: OfferFields<'_>) -> Result<Offer, RepositoryError> {
        let offer = sqlx::query_as(&format!(
            "INSERT INTO offers
                (title, description, offer_type, discount_value, buy_quantity,
                 get_quantity, starts_at, ends_at, is_active, min_purchase_amount,
                 usage_limit)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {OFFER_COLUMNS}"
        ))
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.offer_type)
        .bind(fields.discount_value)
        .bind(fields.buy_quantity)
        .bind(fields.get_quantity)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.is_active)
        .bind(fields.min_purchase_amount)
        .bind(fields.usage_limit)
        .fetch_one(self.pool)
        .await?;

        Ok(offer)
    }

    /// Update an offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn update(
        &self,
        id: OfferId,
        fields: OfferFields<'_>,
    ) -> Result<Offer, RepositoryError> {
        let offer: Option<Offer> = sqlx::query_as(&format!(
            "UPDATE offers
             SET title = $2, description = $3, offer_type = $4, discount_value = $5,
                 buy_quantity = $6, get_quantity = $7, starts_at = $8, ends_at = $9,
                 is_active = $10, min_purchase_amount = $11, usage_limit = $12
             WHERE id = $1
             RETURNING {OFFER_COLUMNS}"
        ))
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.offer_type)
        .bind(fields.discount_value)
        .bind(fields.buy_quantity)
        .bind(fields.get_quantity)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.is_active)
        .bind(fields.min_purchase_amount)
        .bind(fields.usage_limit)
        .fetch_optional(self.pool)
        .await?;

        offer.ok_or(RepositoryError::NotFound)
    }

    /// Delete an offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn delete(&self, id: OfferId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
