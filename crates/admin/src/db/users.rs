//! Admin user lookups.
//!
//! Only reads are needed here: admin accounts are provisioned through
//! the CLI, and the login handler just verifies a password hash.

use sqlx::{FromRow, PgPool};

use gambo_core::UserId;

use super::RepositoryError;

/// A user row with admin-relevant fields.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Repository for admin user lookups.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        #[derive(FromRow)]
        struct Row {
            #[sqlx(flatten)]
            user: AdminUser,
            password_hash: Option<String>,
        }

        let row: Option<Row> = sqlx::query_as(
            "SELECT u.id, u.name, u.email, u.is_admin, p.password_hash
             FROM users u
             LEFT JOIN user_password p ON p.user_id = u.id
             WHERE u.email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|r| r.password_hash.map(|hash| (r.user, hash))))
    }
}
