//! Admin user management command.
//!
//! Creates a new admin account, or promotes an existing account to admin
//! if the email is already registered.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use sqlx::postgres::PgPoolOptions;

use gambo_core::Email;

use super::{CommandError, database_url};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Create an admin user, or promote an existing user to admin.
///
/// # Errors
///
/// Returns an error for invalid input, hashing failures, or database errors.
#[allow(clippy::print_stdout)]
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidInput(format!("invalid email: {e}")))?;

    if name.trim().is_empty() {
        return Err(CommandError::InvalidInput("name is required".to_owned()));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CommandError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)?;

    let url = database_url()?;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    let mut tx = pool.begin().await?;

    if let Some(user_id) = existing {
        // Promote the existing account and reset its password.
        sqlx::query("UPDATE users SET is_admin = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_password (user_id, password_hash) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET password_hash = EXCLUDED.password_hash",
        )
        .bind(user_id)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Promoted existing user {} to admin", email.as_str());
        println!("Promoted existing user {} to admin", email.as_str());
    } else {
        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (name, email, is_admin) VALUES ($1, $2, TRUE) RETURNING id",
        )
        .bind(name.trim())
        .bind(email.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_password (user_id, password_hash) VALUES ($1, $2)")
            .bind(user_id)
            .bind(&password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Created admin user {} (id {})", email.as_str(), user_id);
        println!("Created admin user {} (id {})", email.as_str(), user_id);
    }

    Ok(())
}

fn hash_password(password: &str) -> Result<String, CommandError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| CommandError::PasswordHash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("correct horse battery staple").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"correct horse battery staple", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong password", &parsed)
                .is_err()
        );
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
