//! Address repository.
//!
//! The "at most one default per user" invariant is enforced here: marking
//! an address default clears the previous default inside the same
//! transaction.

use sqlx::{PgPool, Postgres, Transaction};

use gambo_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::address::Address;

const ADDRESS_COLUMNS: &str =
    "id, user_id, phone, street_address, city, postal_code, is_default, created_at";

/// Field values for creating or updating an address.
#[derive(Debug)]
pub struct AddressFields<'a> {
    pub phone: &'a str,
    pub street_address: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
    pub is_default: bool,
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS}
             FROM addresses
             WHERE user_id = $1
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(addresses)
    }

    /// Get an address only if it belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }

    /// Create an address for the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: AddressFields<'_>,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, user_id).await?;
        }

        let address = sqlx::query_as(&format!(
            "INSERT INTO addresses
                (user_id, phone, street_address, city, postal_code, is_default)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(user_id)
        .bind(fields.phone)
        .bind(fields.street_address)
        .bind(fields.city)
        .bind(fields.postal_code)
        .bind(fields.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(address)
    }

    /// Update one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist
    /// for this user.
    pub async fn update(
        &self,
        user_id: UserId,
        address_id: AddressId,
        fields: AddressFields<'_>,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            clear_default(&mut tx, user_id).await?;
        }

        let address: Option<Address> = sqlx::query_as(&format!(
            "UPDATE addresses
             SET phone = $3, street_address = $4, city = $5, postal_code = $6,
                 is_default = $7
             WHERE id = $1 AND user_id = $2
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(address_id)
        .bind(user_id)
        .bind(fields.phone)
        .bind(fields.street_address)
        .bind(fields.city)
        .bind(fields.postal_code)
        .bind(fields.is_default)
        .fetch_optional(&mut *tx)
        .await?;

        let address = address.ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(address)
    }

    /// Whether any non-closed order still references the address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn used_by_active_orders(
        &self,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let used: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM orders
             WHERE shipping_address_id = $1
               AND status NOT IN ('delivered', 'cancelled')
             LIMIT 1",
        )
        .bind(address_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(used.is_some())
    }

    /// Delete one of the user's addresses.
    ///
    /// # Returns
    ///
    /// Returns `true` if an address was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Clear the current default inside an open transaction.
async fn clear_default(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
