//! Payment provider webhook handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use learnhub_core::error::AppError;
use learnhub_service::purchase::WebhookOutcome;

use crate::dto::response::WebhookAckResponse;
use crate::state::AppState;

/// Signature header sent by the payment provider.
const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// POST /api/webhooks/payment
///
/// Unauthenticated; trust comes from the HMAC signature over the raw body.
/// Bad signatures and malformed payloads return 400 so the provider marks
/// the delivery failed. Event types we do not act on are acknowledged with
/// 200 to stop redelivery.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAckResponse>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .purchase_service
        .process_webhook(signature, &body)
        .await?;

    Ok(Json(WebhookAckResponse {
        received: true,
        recorded: matches!(outcome, WebhookOutcome::Recorded(_)),
    }))
}
