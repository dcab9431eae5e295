//! Point activity ledger entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One append-only ledger entry. Positive `points` are awards, negative
/// are spends. Summing a user's entries reproduces their balance.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointActivity {
    /// Unique activity identifier.
    pub id: Uuid,
    /// The user the points belong to.
    pub user_id: Uuid,
    /// Signed point delta. Never zero.
    pub points: i64,
    /// Machine-readable activity tag, e.g. `comment.created`.
    pub activity_type: String,
    /// Human-readable reason for the entry.
    pub reason: String,
    /// When the activity was recorded.
    pub created_at: DateTime<Utc>,
}
