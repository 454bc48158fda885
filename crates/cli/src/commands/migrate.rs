//! Database migration command.
//!
//! Applies the SQL migrations embedded from `crates/storefront/migrations/`.
//! The storefront and admin binaries share one database, so there is a
//! single migration set.

use sqlx::postgres::PgPoolOptions;

use super::{CommandError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;

    tracing::info!("Running migrations");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
