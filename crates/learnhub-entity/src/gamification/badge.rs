//! Badge catalog and grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Badge tier, ordered by prestige.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "badge_tier", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

/// A badge in the catalog. The catalog is seeded at startup; `key` is the
/// stable identifier services grant by.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Badge {
    /// Unique badge identifier.
    pub id: Uuid,
    /// Stable machine-readable key, e.g. `community_contributor`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Criteria description shown to users.
    pub description: String,
    /// Badge tier.
    pub tier: BadgeTier,
    /// Lifetime points required to earn the badge, if threshold-based.
    pub points_threshold: Option<i64>,
}

impl Badge {
    /// Check if a user with the given lifetime points meets the threshold.
    /// Badges without a threshold are granted unconditionally.
    pub fn threshold_met(&self, total_points_earned: i64) -> bool {
        match self.points_threshold {
            Some(threshold) => total_points_earned >= threshold,
            None => true,
        }
    }
}

/// A badge grant. The unique `(user_id, badge_id)` key makes granting
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserBadge {
    /// The badge holder.
    pub user_id: Uuid,
    /// The granted badge.
    pub badge_id: Uuid,
    /// When the badge was earned.
    pub earned_at: DateTime<Utc>,
}

/// A badge joined with when the user earned it. Shape of the profile's
/// earned-badges listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EarnedBadge {
    /// Unique badge identifier.
    pub id: Uuid,
    /// Stable machine-readable key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Criteria description.
    pub description: String,
    /// Badge tier.
    pub tier: BadgeTier,
    /// Lifetime points required, if threshold-based.
    pub points_threshold: Option<i64>,
    /// When the badge was earned.
    pub earned_at: DateTime<Utc>,
}
