//! Payment provider integrations.
//!
//! Two independent flows:
//!
//! - [`stripe`] - card payments via a create-intent / confirm handshake
//! - [`gateway`] - a hosted redirect gateway with a signed callback
//!
//! Both clients talk to configurable API bases so tests can point them at
//! a local stub.

pub mod gateway;
pub mod stripe;

use thiserror::Error;

/// Errors from payment provider operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Network-level failure talking to the provider.
    #[error("payment provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success HTTP status.
    #[error("payment provider returned {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Provider response could not be parsed.
    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),

    /// Payment was not completed (wrong status, declined card).
    #[error("payment declined: {0}")]
    Declined(String),

    /// Callback signature did not match.
    #[error("callback signature mismatch")]
    SignatureMismatch,
}
