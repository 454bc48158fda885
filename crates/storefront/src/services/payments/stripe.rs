//! Card payment client (create-intent / confirm flow).
//!
//! Talks to the Stripe-compatible `PaymentIntents` API: the storefront
//! creates an intent server-side, hands the client secret to the browser,
//! and later confirms the intent reached `succeeded` before marking the
//! order paid. Amounts cross the wire in minor units.

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use gambo_core::{CurrencyCode, Money};

use super::PaymentError;
use crate::config::StripeConfig;

/// Intent status the provider reports once the charge has settled.
const STATUS_SUCCEEDED: &str = "succeeded";

/// A payment intent as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Provider-side intent id, stored on the order as the payment reference.
    pub id: String,
    /// Secret the browser needs to complete the card flow.
    pub client_secret: Option<String>,
    /// Amount in minor units.
    pub amount: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Intent lifecycle status.
    pub status: String,
}

/// Card gateway API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a new card gateway client.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            secret_key: config.secret_key.expose_secret().to_owned(),
        }
    }

    /// Create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Provider` on a non-success response.
    #[instrument(skip(self), fields(amount = %amount, currency = %currency))]
    pub async fn create_intent(
        &self,
        amount: Money,
        currency: CurrencyCode,
        reference: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let params = [
            ("amount", amount.minor_units().to_string()),
            ("currency", currency.code().to_lowercase()),
            ("metadata[reference]", reference.to_owned()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        parse_intent(response).await
    }

    /// Retrieve an intent and require it to have succeeded.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Declined` if the intent exists but is not in
    /// the succeeded state.
    #[instrument(skip(self))]
    pub async fn confirm_succeeded(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents/{intent_id}", self.api_base);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        let intent = parse_intent(response).await?;

        if intent.status != STATUS_SUCCEEDED {
            return Err(PaymentError::Declined(format!(
                "payment is in state '{}', expected '{STATUS_SUCCEEDED}'",
                intent.status
            )));
        }

        Ok(intent)
    }
}

async fn parse_intent(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PaymentError::Provider { status, body });
    }

    response
        .json::<PaymentIntent>()
        .await
        .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
}
