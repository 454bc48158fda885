//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed.
    #[error("Password hashing error")]
    PasswordHash,
}

/// Resolve the database URL from the environment.
///
/// # Errors
///
/// Returns `CommandError::MissingEnvVar` if neither `GAMBO_DATABASE_URL`
/// nor `DATABASE_URL` is set.
pub fn database_url() -> Result<String, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("GAMBO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("GAMBO_DATABASE_URL"))
}
