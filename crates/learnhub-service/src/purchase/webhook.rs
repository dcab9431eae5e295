//! Payment provider webhook verification and payload parsing.
//!
//! Webhooks carry a signature header of the form `t=<unix>,v1=<hex>` where the
//! hex value is an HMAC-SHA256 over `"{timestamp}.{body}"` keyed with the
//! shared webhook secret. Requests outside the timestamp tolerance window are
//! rejected even when the signature matches, which bounds replay.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Verifies payment webhook signatures.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_seconds: i64,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>, tolerance_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds,
        }
    }

    /// Check a signature header against the raw request body.
    ///
    /// `now` is the current unix timestamp, passed in so callers and tests
    /// control the clock.
    pub fn verify(&self, signature_header: &str, body: &[u8], now: i64) -> AppResult<()> {
        let (timestamp, signature_hex) = parse_signature_header(signature_header)?;

        if (now - timestamp).abs() > self.tolerance_seconds {
            return Err(AppError::validation(
                "Webhook timestamp outside the tolerance window",
            ));
        }

        let signature = decode_hex(&signature_hex)?;
        let mut mac = self.mac(timestamp)?;
        mac.update(body);
        mac.verify_slice(&signature)
            .map_err(|_| AppError::validation("Webhook signature mismatch"))
    }

    /// Produce a signature header for `body` at `timestamp`. The counterpart
    /// of [`verify`](Self::verify), used to build signed test payloads.
    pub fn sign(&self, body: &[u8], timestamp: i64) -> AppResult<String> {
        let mut mac = self.mac(timestamp)?;
        mac.update(body);
        let digest = mac.finalize().into_bytes();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Ok(format!("t={timestamp},v1={hex}"))
    }

    fn mac(&self, timestamp: i64) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| AppError::internal("Webhook secret rejected by HMAC"))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        Ok(mac)
    }
}

fn parse_signature_header(header: &str) -> AppResult<(i64, String)> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            Some(("v1", value)) => {
                signature = Some(value.to_string());
            }
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(v)) => Ok((t, v)),
        _ => Err(AppError::validation("Malformed webhook signature header")),
    }
}

fn decode_hex(hex: &str) -> AppResult<Vec<u8>> {
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(AppError::validation("Malformed webhook signature"));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| AppError::validation("Malformed webhook signature"))
        })
        .collect()
}

/// A parsed payment provider event.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    /// Provider event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    pub object: CheckoutObject,
}

/// The checkout session embedded in a payment event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutObject {
    /// Provider-side session id, stored as the purchase's provider reference.
    #[serde(default)]
    pub id: Option<String>,
    /// Metadata attached at checkout creation. Must carry `user_id` and
    /// `course_id` for completed sessions.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentEvent {
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))
    }

    /// Read a UUID out of the checkout metadata.
    pub fn metadata_uuid(&self, key: &str) -> AppResult<Uuid> {
        let raw = self
            .data
            .object
            .metadata
            .get(key)
            .ok_or_else(|| AppError::validation(format!("Webhook metadata missing '{key}'")))?;
        Uuid::parse_str(raw)
            .map_err(|_| AppError::validation(format!("Webhook metadata '{key}' is not a UUID")))
    }
}
