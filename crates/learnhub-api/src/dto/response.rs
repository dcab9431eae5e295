//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_entity::gamification::badge::Badge;
use learnhub_entity::purchase::model::Purchase;
use learnhub_service::gamification::BadgeCheckOutcome;
use learnhub_service::purchase::PurchaseOutcome;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Database reachability.
    pub database: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Users with at least one connection.
    pub online_users: usize,
}

/// Purchase result, shared by the webhook and client confirmation paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    /// The purchase row (pre-existing when `already_purchased` is set).
    pub purchase: Purchase,
    /// True when the course was already owned and nothing was written.
    pub already_purchased: bool,
}

impl From<PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        Self {
            purchase: outcome.purchase,
            already_purchased: outcome.already_purchased,
        }
    }
}

/// Ownership status of a course for the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseStatusResponse {
    /// Whether the user owns the course.
    pub purchased: bool,
    /// The purchase row, when one exists.
    pub purchase: Option<Purchase>,
}

/// Acknowledgement returned to the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAckResponse {
    /// Always true for 200 responses.
    pub received: bool,
    /// Whether a purchase was recorded (false for ignored event types).
    pub recorded: bool,
}

/// Presence snapshot for a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceResponse {
    /// Distinct user ids currently present.
    pub members: Vec<Uuid>,
    /// Member count.
    pub count: usize,
}

/// Result of a badge check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeCheckResponse {
    /// One of `granted`, `already_held`, `below_threshold`.
    pub outcome: String,
    /// The badge that was checked.
    pub badge: Badge,
    /// Points required, present only for `below_threshold`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<i64>,
    /// The user's lifetime points, present only for `below_threshold`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<i64>,
}

impl From<BadgeCheckOutcome> for BadgeCheckResponse {
    fn from(outcome: BadgeCheckOutcome) -> Self {
        match outcome {
            BadgeCheckOutcome::Granted(badge) => Self {
                outcome: "granted".to_string(),
                badge,
                required: None,
                current: None,
            },
            BadgeCheckOutcome::AlreadyHeld(badge) => Self {
                outcome: "already_held".to_string(),
                badge,
                required: None,
                current: None,
            },
            BadgeCheckOutcome::BelowThreshold {
                badge,
                required,
                current,
            } => Self {
                outcome: "below_threshold".to_string(),
                badge,
                required: Some(required),
                current: Some(current),
            },
        }
    }
}
