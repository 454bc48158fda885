//! Hosted redirect gateway client (start / callback flow).
//!
//! The storefront posts the order to the gateway, redirects the shopper to
//! the returned `redirect_url`, and later receives a callback carrying a
//! transaction id, amount, status and an HMAC-SHA256 signature over
//! `transaction_id:amount:status` keyed by the store secret. The callback
//! is only trusted if the signature verifies.

use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::instrument;

use gambo_core::Money;

use super::PaymentError;
use crate::config::HostedGatewayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Status value the gateway reports for a completed payment.
const STATUS_VALID: &str = "VALID";

/// Session returned by the gateway when a payment is initiated.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySession {
    /// Gateway-side transaction id; stored in the shopper's session until
    /// the callback arrives.
    pub transaction_id: String,
    /// Hosted payment page the shopper is redirected to.
    pub redirect_url: String,
}

/// Fields of a gateway callback, as received on the return redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCallback {
    pub transaction_id: String,
    /// Amount echoed back by the gateway, formatted with two decimals.
    pub amount: String,
    /// `VALID` for a completed payment, anything else is a failure.
    pub status: String,
    /// Lowercase hex HMAC-SHA256 over `transaction_id:amount:status`.
    pub signature: String,
}

/// Hosted gateway API client.
#[derive(Clone)]
pub struct HostedGatewayClient {
    client: reqwest::Client,
    api_base: String,
    store_id: String,
    store_secret: String,
}

impl HostedGatewayClient {
    /// Create a new hosted gateway client.
    #[must_use]
    pub fn new(config: &HostedGatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            store_id: config.store_id.clone(),
            store_secret: config.store_secret.expose_secret().to_owned(),
        }
    }

    /// Initiate a payment session for an order.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Provider` on a non-success response.
    #[instrument(skip(self, success_url, fail_url), fields(amount = %amount))]
    pub async fn create_session(
        &self,
        order_number: &str,
        amount: Money,
        success_url: &str,
        fail_url: &str,
    ) -> Result<GatewaySession, PaymentError> {
        let url = format!("{}/gwprocess/v4/api.php", self.api_base);
        let params = [
            ("store_id", self.store_id.as_str()),
            ("store_passwd", self.store_secret.as_str()),
            ("tran_id", order_number),
            ("total_amount", &format!("{amount}")),
            ("success_url", success_url),
            ("fail_url", fail_url),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Provider { status, body });
        }

        response
            .json::<GatewaySession>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }

    /// Verify a callback and require a completed payment.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::SignatureMismatch` if the signature does not
    /// verify, `PaymentError::Declined` if it verifies but the status is
    /// not `VALID`.
    pub fn verify_callback(&self, callback: &GatewayCallback) -> Result<(), PaymentError> {
        if !verify_signature(
            &self.store_secret,
            &callback.transaction_id,
            &callback.amount,
            &callback.status,
            &callback.signature,
        ) {
            return Err(PaymentError::SignatureMismatch);
        }

        if callback.status != STATUS_VALID {
            return Err(PaymentError::Declined(format!(
                "gateway reported status '{}'",
                callback.status
            )));
        }

        Ok(())
    }
}

/// Constant-time comparison of an expected signature against the received
/// one.
fn verify_signature(
    secret: &str,
    transaction_id: &str,
    amount: &str,
    status: &str,
    signature: &str,
) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{transaction_id}:{amount}:{status}").as_bytes());

    let Ok(received) = hex::decode(signature) else {
        return false;
    };

    mac.verify_slice(&received).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "test-store-secret";

    /// Hex HMAC-SHA256 over `transaction_id:amount:status`, as the gateway
    /// computes it.
    fn sign(secret: &str, transaction_id: &str, amount: &str, status: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{transaction_id}:{amount}:{status}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signature_roundtrip() {
        let sig = sign(SECRET, "TXN123", "250.00", "VALID");
        assert!(verify_signature(SECRET, "TXN123", "250.00", "VALID", &sig));
    }

    #[test]
    fn test_signature_rejects_tampered_amount() {
        let sig = sign(SECRET, "TXN123", "250.00", "VALID");
        assert!(!verify_signature(SECRET, "TXN123", "1.00", "VALID", &sig));
    }

    #[test]
    fn test_signature_rejects_tampered_status() {
        let sig = sign(SECRET, "TXN123", "250.00", "FAILED");
        assert!(!verify_signature(SECRET, "TXN123", "250.00", "VALID", &sig));
    }

    #[test]
    fn test_signature_rejects_wrong_key() {
        let sig = sign("other-secret", "TXN123", "250.00", "VALID");
        assert!(!verify_signature(SECRET, "TXN123", "250.00", "VALID", &sig));
    }

    #[test]
    fn test_signature_rejects_non_hex() {
        assert!(!verify_signature(SECRET, "TXN123", "250.00", "VALID", "zzzz"));
    }

    #[test]
    fn test_verify_callback_declined_status() {
        let config = HostedGatewayConfig {
            store_id: "store1".to_owned(),
            store_secret: secrecy::SecretString::from(SECRET),
            api_base: "http://localhost:1".to_owned(),
        };
        let client = HostedGatewayClient::new(&config);

        let callback = GatewayCallback {
            transaction_id: "TXN123".to_owned(),
            amount: "250.00".to_owned(),
            status: "FAILED".to_owned(),
            signature: sign(SECRET, "TXN123", "250.00", "FAILED"),
        };

        assert!(matches!(
            client.verify_callback(&callback),
            Err(PaymentError::Declined(_))
        ));
    }

    #[test]
    fn test_verify_callback_valid() {
        let config = HostedGatewayConfig {
            store_id: "store1".to_owned(),
            store_secret: secrecy::SecretString::from(SECRET),
            api_base: "http://localhost:1".to_owned(),
        };
        let client = HostedGatewayClient::new(&config);

        let callback = GatewayCallback {
            transaction_id: "TXN123".to_owned(),
            amount: "250.00".to_owned(),
            status: "VALID".to_owned(),
            signature: sign(SECRET, "TXN123", "250.00", "VALID"),
        };

        assert!(client.verify_callback(&callback).is_ok());
    }
}
