//! Handler for the payment provider webhook.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use crate::domain::entities::PaymentDetails;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// Records a payment outcome.
///
/// # Endpoint
///
/// `POST /webhooks/payments`
///
/// # Request Body
///
/// ```json
/// {
///   "order_id": 42,
///   "payment_intent_id": "pi_3Nk...",
///   "status": "succeeded",
///   "amount": "59.90",
///   "currency": "usd",
///   "payment_method": "card"
/// }
/// ```
///
/// `succeeded` marks the order `PAID`/`CONFIRMED`; `failed` and `refunded`
/// only change the payment status.
///
/// # Errors
///
/// Returns 401 if `X-Payment-Signature` is missing or does not match.
/// Returns 400 if the body is malformed or the amount differs from the order total.
/// Returns 404 for an unknown order.
pub async fn payment_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PaymentDetails>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let payment = state.order_service.record_payment(&body, signature).await?;
    Ok(Json(payment))
}
