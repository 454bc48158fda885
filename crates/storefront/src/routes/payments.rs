//! Payment route handlers.
//!
//! Two flows, both ending in the same checkout path:
//!
//! - Card: create an intent for the cart total, let the browser complete
//!   the card handshake, then confirm the intent succeeded and place the
//!   order.
//! - Hosted gateway: start a session, park the pending transaction in the
//!   shopper's session, redirect out, and place the order only after the
//!   signed callback verifies.
//!
//! In both flows the amount actually charged is compared against the
//! cart's current grand total before the order is placed; a cart edited
//! after the payment started conflicts instead of producing an
//! underpaid order.

use axum::{Form, Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;

use gambo_core::{AddressId, Money, PaymentMethod};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::services::checkout::{CheckoutRequest, CheckoutService};
use crate::services::payments::PaymentError;
use crate::services::payments::gateway::GatewayCallback;
use crate::state::AppState;

/// Request body for confirming a card payment.
#[derive(Debug, Deserialize)]
pub struct ConfirmCardRequest {
    pub intent_id: String,
    pub shipping_address_id: AddressId,
    pub notes: Option<String>,
}

/// Request body for starting a hosted gateway payment.
#[derive(Debug, Deserialize)]
pub struct StartGatewayRequest {
    pub shipping_address_id: AddressId,
    pub notes: Option<String>,
}

/// The in-flight gateway payment parked in the shopper's session between
/// the redirect out and the callback.
#[derive(Debug, Serialize, Deserialize)]
struct PendingGatewayPayment {
    transaction_id: String,
    shipping_address_id: AddressId,
    notes: Option<String>,
}

/// Require the amount a card intent was created for to still equal the
/// cart's grand total, in minor units.
///
/// The cart is mutable between intent creation and confirmation; without
/// this check a shopper could grow the cart after authorizing a smaller
/// charge.
fn ensure_intent_covers_cart(intent_minor: i64, total: Money) -> Result<()> {
    if intent_minor == total.minor_units() {
        Ok(())
    } else {
        Err(AppError::Conflict(
            "cart changed since payment was started".to_owned(),
        ))
    }
}

/// Require the signature-protected amount in a gateway callback to still
/// equal the cart's grand total.
///
/// The comparison is numeric, so gateways that echo the amount at a
/// different decimal scale still match.
fn ensure_callback_covers_cart(amount: &str, total: Money) -> Result<()> {
    let charged: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("unreadable callback amount".to_owned()))?;

    if charged == total.amount() {
        Ok(())
    } else {
        Err(AppError::Conflict(
            "cart changed since payment was started".to_owned(),
        ))
    }
}

/// POST /payments/card/intent
///
/// Creates an intent for the shopper's current cart total and returns the
/// client secret the browser needs.
///
/// # Errors
///
/// Returns 400 for an empty cart, 502 if the provider call fails.
pub async fn create_card_intent(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let service = CheckoutService::new(state.pool(), state.config().delivery_charge);
    let totals = service.preview_totals(user.id).await?;

    if totals.total_items == 0 {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let intent = state
        .stripe()
        .create_intent(totals.total, state.config().currency, &format!("u{}", user.id))
        .await?;

    Ok(Json(json!({
        "intent_id": intent.id,
        "client_secret": intent.client_secret,
        "amount": intent.amount,
        "currency": intent.currency,
        "publishable_key": state.config().stripe.publishable_key,
    })))
}

/// POST /payments/card/confirm
///
/// Verifies the intent reached `succeeded` at the provider and that its
/// amount still equals the cart's grand total, then places the order as
/// paid with the intent id as the payment reference.
///
/// # Errors
///
/// Returns 422 if the intent did not succeed, 409 if the cart total no
/// longer matches the charged amount, 400 for cart problems.
pub async fn confirm_card(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ConfirmCardRequest>,
) -> Result<Json<Value>> {
    let intent = state.stripe().confirm_succeeded(&body.intent_id).await?;

    let service = CheckoutService::new(state.pool(), state.config().delivery_charge);
    let totals = service.preview_totals(user.id).await?;
    ensure_intent_covers_cart(intent.amount, totals.total)?;

    let order = service
        .place_order(
            user.id,
            CheckoutRequest {
                shipping_address_id: body.shipping_address_id,
                payment_method: PaymentMethod::Card,
                payment_ref: Some(&intent.id),
                notes: body.notes.as_deref(),
            },
        )
        .await?;

    tracing::info!(
        order_number = %order.order_number,
        intent_id = %intent.id,
        "card order placed"
    );

    Ok(Json(json!({ "order": order, "grand_total": order.grand_total() })))
}

/// POST /payments/gateway/start
///
/// Starts a hosted gateway session for the cart total and parks the
/// transaction in the shopper's session until the callback arrives.
///
/// # Errors
///
/// Returns 400 for an empty cart or a foreign address, 502 if the
/// provider call fails.
pub async fn start_gateway(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(body): Json<StartGatewayRequest>,
) -> Result<Json<Value>> {
    let service = CheckoutService::new(state.pool(), state.config().delivery_charge);
    let totals = service.preview_totals(user.id).await?;

    if totals.total_items == 0 {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let base = &state.config().base_url;
    let gateway_session = state
        .gateway()
        .create_session(
            &format!("u{}-{}", user.id, chrono::Utc::now().timestamp()),
            totals.total,
            &format!("{base}/payments/gateway/callback"),
            &format!("{base}/payments/gateway/callback"),
        )
        .await?;

    let pending = PendingGatewayPayment {
        transaction_id: gateway_session.transaction_id.clone(),
        shipping_address_id: body.shipping_address_id,
        notes: body.notes,
    };
    session
        .insert(session_keys::GATEWAY_TRANSACTION, &pending)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "redirect_url": gateway_session.redirect_url })))
}

/// POST /payments/gateway/callback
///
/// Receives the gateway's form post. Verifies the callback signature and
/// status, checks the transaction is the one this shopper started and
/// that the signed amount still equals the cart's grand total, then
/// places the order as paid.
///
/// # Errors
///
/// Returns 422 for a bad signature or failed payment, 409 if the cart
/// total no longer matches the paid amount, 400 when no payment is in
/// flight.
pub async fn gateway_callback(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(callback): Form<GatewayCallback>,
) -> Result<Json<Value>> {
    let pending: PendingGatewayPayment = session
        .get(session_keys::GATEWAY_TRANSACTION)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::BadRequest("no payment in progress".to_owned()))?;

    if pending.transaction_id != callback.transaction_id {
        return Err(AppError::Payment(PaymentError::SignatureMismatch));
    }

    state.gateway().verify_callback(&callback)?;

    let service = CheckoutService::new(state.pool(), state.config().delivery_charge);
    let totals = service.preview_totals(user.id).await?;
    ensure_callback_covers_cart(&callback.amount, totals.total)?;

    let order = service
        .place_order(
            user.id,
            CheckoutRequest {
                shipping_address_id: pending.shipping_address_id,
                payment_method: PaymentMethod::Gateway,
                payment_ref: Some(&callback.transaction_id),
                notes: pending.notes.as_deref(),
            },
        )
        .await?;

    session
        .remove::<PendingGatewayPayment>(session_keys::GATEWAY_TRANSACTION)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(
        order_number = %order.order_number,
        transaction_id = %callback.transaction_id,
        "gateway order placed"
    );

    Ok(Json(json!({ "order": order, "grand_total": order.grand_total() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(units: i64, scale: u32) -> Money {
        Money::new(Decimal::new(units, scale))
    }

    #[test]
    fn test_intent_amount_must_match_cart_total() {
        assert!(ensure_intent_covers_cart(25000, money(25000, 2)).is_ok());
    }

    #[test]
    fn test_intent_rejected_when_cart_grew_after_intent() {
        // Intent was authorized for 150.00, cart now totals 300.00.
        let result = ensure_intent_covers_cart(15000, money(30000, 2));
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_callback_amount_must_match_cart_total() {
        assert!(ensure_callback_covers_cart("250.00", money(25000, 2)).is_ok());
    }

    #[test]
    fn test_callback_amount_comparison_is_scale_insensitive() {
        assert!(ensure_callback_covers_cart("250", money(25000, 2)).is_ok());
        assert!(ensure_callback_covers_cart(" 250.0000 ", money(25000, 2)).is_ok());
    }

    #[test]
    fn test_callback_rejected_when_cart_grew_after_redirect() {
        let result = ensure_callback_covers_cart("150.00", money(30000, 2));
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_callback_rejects_unparseable_amount() {
        let result = ensure_callback_covers_cart("12,50", money(1250, 2));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
