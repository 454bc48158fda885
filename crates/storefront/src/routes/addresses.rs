//! Address route handlers.
//!
//! Deletion is guarded twice: the default address cannot be deleted, and
//! neither can an address still referenced by an order that has not been
//! delivered or cancelled.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use gambo_core::AddressId;

use crate::db::addresses::{AddressFields, AddressRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Address;
use crate::state::AppState;

/// Minimum digits in a phone number.
const MIN_PHONE_DIGITS: usize = 10;

/// Request body for creating or updating an address.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn validate(&self) -> Result<()> {
        validate_phone(&self.phone)?;

        if self.street_address.trim().is_empty() {
            return Err(AppError::BadRequest("street address is required".to_owned()));
        }
        if self.city.trim().is_empty() {
            return Err(AppError::BadRequest("city is required".to_owned()));
        }

        Ok(())
    }

    fn fields(&self) -> AddressFields<'_> {
        AddressFields {
            phone: &self.phone,
            street_address: &self.street_address,
            city: &self.city,
            postal_code: &self.postal_code,
            is_default: self.is_default,
        }
    }
}

/// GET /account/addresses
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let repo = AddressRepository::new(state.pool());
    Ok(Json(repo.list_for_user(user.id).await?))
}

/// POST /account/addresses
///
/// # Errors
///
/// Returns 400 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Address>> {
    body.validate()?;

    let repo = AddressRepository::new(state.pool());
    let address = repo.create(user.id, body.fields()).await?;

    Ok(Json(address))
}

/// PUT /account/addresses/{id}
///
/// # Errors
///
/// Returns 404 for another user's address, 400 for invalid fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(address_id): Path<AddressId>,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Address>> {
    body.validate()?;

    let repo = AddressRepository::new(state.pool());
    let address = repo.update(user.id, address_id, body.fields()).await?;

    Ok(Json(address))
}

/// DELETE /account/addresses/{id}
///
/// # Errors
///
/// Returns 409 for the default address or one still used by an open
/// order, 404 if it does not exist for this user.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(address_id): Path<AddressId>,
) -> Result<Json<Value>> {
    let repo = AddressRepository::new(state.pool());

    let address = repo
        .get_owned(user.id, address_id)
        .await?
        .ok_or_else(|| AppError::NotFound("address not found".to_owned()))?;

    if address.is_default {
        return Err(AppError::Conflict(
            "the default address cannot be deleted".to_owned(),
        ));
    }

    if repo.used_by_active_orders(address_id).await? {
        return Err(AppError::Conflict(
            "address is used by an order that is still in progress".to_owned(),
        ));
    }

    repo.delete(user.id, address_id).await?;

    Ok(Json(json!({ "ok": true })))
}

/// Phone numbers must carry at least ten digits; separators are allowed.
fn validate_phone(phone: &str) -> Result<()> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if digits < MIN_PHONE_DIGITS {
        return Err(AppError::BadRequest(format!(
            "phone number must contain at least {MIN_PHONE_DIGITS} digits"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_too_short() {
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_phone_valid() {
        assert!(validate_phone("01712345678").is_ok());
    }

    #[test]
    fn test_phone_with_separators() {
        assert!(validate_phone("+880 17-1234-5678").is_ok());
    }

    #[test]
    fn test_phone_letters_do_not_count() {
        assert!(validate_phone("call-me-maybe").is_err());
    }
}
