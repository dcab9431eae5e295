//! Payment provider webhook configuration.

use serde::{Deserialize, Serialize};

/// Payment webhook verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret for webhook signature verification.
    #[serde(default = "default_webhook_secret")]
    pub webhook_secret: String,
    /// Maximum accepted age of a signed webhook timestamp in seconds.
    #[serde(default = "default_tolerance")]
    pub timestamp_tolerance_seconds: i64,
    /// Event type that marks a completed checkout.
    #[serde(default = "default_completed_event")]
    pub completed_event_type: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: default_webhook_secret(),
            timestamp_tolerance_seconds: default_tolerance(),
            completed_event_type: default_completed_event(),
        }
    }
}

fn default_webhook_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_tolerance() -> i64 {
    300
}

fn default_completed_event() -> String {
    "checkout.session.completed".to_string()
}
