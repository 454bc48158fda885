//! Address model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use gambo_core::{AddressId, UserId};

/// A shipping/billing address. At most one per user may be the default.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
