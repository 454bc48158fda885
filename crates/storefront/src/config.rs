//! Storefront configuration loaded from environment variables.
//!
//! The original application kept site and payment settings in a mutable
//! database singleton; here everything is loaded once at startup into an
//! explicit, immutable config passed to the handlers that need it.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GAMBO_DATABASE_URL` - `PostgreSQL` connection string
//! - `GAMBO_BASE_URL` - Public URL for the storefront
//! - `GAMBO_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `STRIPE_SECRET_KEY` - Card gateway secret key
//! - `STRIPE_PUBLISHABLE_KEY` - Card gateway publishable key
//! - `GATEWAY_STORE_ID` - Hosted gateway store id
//! - `GATEWAY_STORE_SECRET` - Hosted gateway store secret (signs callbacks)
//!
//! ## Optional
//! - `GAMBO_HOST` - Bind address (default: 127.0.0.1)
//! - `GAMBO_PORT` - Listen port (default: 3000)
//! - `GAMBO_DELIVERY_CHARGE` - Flat delivery surcharge (default: 50.00)
//! - `GAMBO_CURRENCY` - ISO 4217 store currency (default: BDT)
//! - `STRIPE_API_BASE` - Card gateway base URL (default: https://api.stripe.com)
//! - `GATEWAY_API_BASE` - Hosted gateway base URL
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use gambo_core::{CurrencyCode, Money};

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Flat delivery surcharge added to every order
    pub delivery_charge: Money,
    /// Store currency
    pub currency: CurrencyCode,
    /// Card gateway (intent/confirm flow)
    pub stripe: StripeConfig,
    /// Hosted gateway (redirect/verify flow)
    pub gateway: HostedGatewayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Card gateway configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// Server-side API key
    pub secret_key: SecretString,
    /// Client-side key, safe to expose in responses
    pub publishable_key: String,
    /// API base URL; overridable so tests can point at a stub
    pub api_base: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("publishable_key", &self.publishable_key)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Hosted redirect gateway configuration.
#[derive(Clone)]
pub struct HostedGatewayConfig {
    /// Merchant identifier at the gateway
    pub store_id: String,
    /// Shared secret; also keys the callback signature
    pub store_secret: SecretString,
    /// API base URL; overridable so tests can point at a stub
    pub api_base: String,
}

impl std::fmt::Debug for HostedGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedGatewayConfig")
            .field("store_id", &self.store_id)
            .field("store_secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("GAMBO_DATABASE_URL")?;
        let host = get_env_or_default("GAMBO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GAMBO_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("GAMBO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GAMBO_PORT".to_owned(), e.to_string()))?;
        let base_url = get_required_env("GAMBO_BASE_URL")?;

        let session_secret = get_validated_secret("GAMBO_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "GAMBO_SESSION_SECRET")?;

        let delivery_charge = get_env_or_default("GAMBO_DELIVERY_CHARGE", "50.00")
            .parse::<Decimal>()
            .map(Money::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GAMBO_DELIVERY_CHARGE".to_owned(), e.to_string())
            })?;
        let currency = get_env_or_default("GAMBO_CURRENCY", "BDT")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("GAMBO_CURRENCY".to_owned(), e))?;

        let stripe = StripeConfig::from_env()?;
        let gateway = HostedGatewayConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            delivery_charge,
            currency,
            stripe,
            gateway,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            publishable_key: get_required_env("STRIPE_PUBLISHABLE_KEY")?,
            api_base: get_env_or_default("STRIPE_API_BASE", "https://api.stripe.com"),
        })
    }
}

impl HostedGatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_id: get_required_env("GATEWAY_STORE_ID")?,
            store_secret: get_validated_secret("GATEWAY_STORE_SECRET")?,
            api_base: get_env_or_default(
                "GATEWAY_API_BASE",
                "https://sandbox.sslcommerz.com",
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StripeConfig {
            secret_key: SecretString::from("sk_live_very_private_0123456789"),
            publishable_key: "pk_live_visible".to_owned(),
            api_base: "https://api.stripe.com".to_owned(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("pk_live_visible"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_very_private"));
    }
}
