//! Database access layer for the admin API.
//!
//! The admin binary shares the storefront database but carries its own
//! repositories: reporting aggregates, order management, and catalog
//! administration that the public API never exposes.

pub mod categories;
pub mod offers;
pub mod orders;
pub mod reports;
pub mod users;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data failed validation on read.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Row not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint or state conflict.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
