//! Admin authentication route handlers.
//!
//! Login verifies the password against the shared users table and then
//! requires the `is_admin` flag; a valid shopper account is rejected
//! before any session is written.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// # Errors
///
/// Returns 401 for wrong credentials, 403 for non-admin accounts.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let users = UserRepository::new(state.pool());
    let (user, password_hash) = users
        .get_with_password_hash(&body.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_owned()))?;

    verify_password(&body.password, &password_hash)?;

    if !user.is_admin {
        return Err(AppError::Forbidden(
            "This account has no admin access".to_owned(),
        ));
    }

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let admin = CurrentAdmin {
        id: user.id,
        name: user.name,
        email: user.email,
    };
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %admin.id, "admin logged in");

    Ok(Json(admin))
}

/// POST /auth/logout
///
/// # Errors
///
/// Returns 500 if the session store fails.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "ok": true })))
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Unauthorized("Invalid credentials".to_owned()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid credentials".to_owned()))
}
