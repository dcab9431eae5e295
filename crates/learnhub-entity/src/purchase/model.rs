//! Purchase entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which writer recorded the purchase first.
///
/// The payment provider's webhook and the client's post-checkout fallback
/// both try to record the same purchase. Whichever insert wins tags the
/// row; the loser observes the existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "purchase_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseSource {
    /// Recorded by the payment provider webhook.
    Webhook,
    /// Recorded by the client fallback after checkout.
    Client,
}

/// A recorded course purchase. Rows are immutable: created once, never
/// updated, never deleted by normal flow. The unique `(user_id, course_id)`
/// key makes recording idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    /// Unique purchase identifier.
    pub id: Uuid,
    /// The purchasing user.
    pub user_id: Uuid,
    /// The purchased course.
    pub course_id: Uuid,
    /// Amount paid in the smallest currency unit, captured at purchase time.
    pub amount_cents: i64,
    /// Which writer recorded the row.
    pub source: PurchaseSource,
    /// Payment provider reference (checkout session id), when known.
    pub provider_ref: Option<String>,
    /// When the purchase was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPurchase {
    /// The purchasing user.
    pub user_id: Uuid,
    /// The purchased course.
    pub course_id: Uuid,
    /// Amount paid in the smallest currency unit.
    pub amount_cents: i64,
    /// Which writer is recording.
    pub source: PurchaseSource,
    /// Payment provider reference, when known.
    pub provider_ref: Option<String>,
}
