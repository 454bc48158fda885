//! Offer administration route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::OfferId;

use crate::db::offers::{OfferFields, OfferRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Offer;
use crate::state::AppState;

const OFFER_TYPES: &[&str] = &["percentage", "fixed", "buy_get"];

/// Request body for creating or updating an offer.
#[derive(Debug, Deserialize)]
pub struct OfferRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub offer_type: String,
    #[serde(default)]
    pub discount_value: Decimal,
    pub buy_quantity: Option<i32>,
    pub get_quantity: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub min_purchase_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
}

const fn default_active() -> bool {
    true
}

impl OfferRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_owned()));
        }
        if !OFFER_TYPES.contains(&self.offer_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "offer_type must be one of: {}",
                OFFER_TYPES.join(", ")
            )));
        }
        if self.ends_at <= self.starts_at {
            return Err(AppError::BadRequest(
                "ends_at must be after starts_at".to_owned(),
            ));
        }
        if self.offer_type == "buy_get"
            && (self.buy_quantity.is_none() || self.get_quantity.is_none())
        {
            return Err(AppError::BadRequest(
                "buy_get offers need buy_quantity and get_quantity".to_owned(),
            ));
        }

        Ok(())
    }

    fn fields(&self) -> OfferFields<'_> {
        OfferFields {
            title: &self.title,
            description: &self.description,
            offer_type: &self.offer_type,
            discount_value: self.discount_value,
            buy_quantity: self.buy_quantity,
            get_quantity: self.get_quantity,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            min_purchase_amount: self.min_purchase_amount,
            usage_limit: self.usage_limit,
        }
    }
}

/// GET /offers
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Offer>>> {
    let repo = OfferRepository::new(state.pool());
    Ok(Json(repo.list().await?))
}

/// POST /offers
///
/// # Errors
///
/// Returns 400 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<OfferRequest>,
) -> Result<Json<Offer>> {
    body.validate()?;

    let repo = OfferRepository::new(state.pool());
    Ok(Json(repo.create(body.fields()).await?))
}

/// PUT /offers/{id}
///
/// # Errors
///
/// Returns 404 for unknown ids, 400 for invalid fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OfferId>,
    Json(body): Json<OfferRequest>,
) -> Result<Json<Offer>> {
    body.validate()?;

    let repo = OfferRepository::new(state.pool());
    Ok(Json(repo.update(id, body.fields()).await?))
}

/// DELETE /offers/{id}
///
/// # Errors
///
/// Returns 404 for unknown ids.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OfferId>,
) -> Result<Json<Value>> {
    let repo = OfferRepository::new(state.pool());
    repo.delete(id).await?;

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(offer_type: &str) -> OfferRequest {
        OfferRequest {
            title: "Summer Sale".to_owned(),
            description: String::new(),
            offer_type: offer_type.to_owned(),
            discount_value: Decimal::from(10),
            buy_quantity: None,
            get_quantity: None,
            starts_at: Utc::now(),
            ends_at: Utc::now() + chrono::Duration::days(7),
            is_active: true,
            min_purchase_amount: None,
            usage_limit: None,
        }
    }

    #[test]
    fn test_valid_percentage_offer() {
        assert!(request("percentage").validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert!(request("bogo").validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_window() {
        let mut r = request("fixed");
        r.ends_at = r.starts_at - chrono::Duration::hours(1);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_buy_get_requires_quantities() {
        assert!(request("buy_get").validate().is_err());

        let mut r = request("buy_get");
        r.buy_quantity = Some(2);
        r.get_quantity = Some(1);
        assert!(r.validate().is_ok());
    }
}
