//! User gamification profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cached gamification totals for one user.
///
/// The point activity ledger is the source of truth; this row is a
/// write-through projection updated in the same transaction as each ledger
/// append. `points` is the spendable balance and may go down;
/// `total_points_earned` only ever goes up.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// The profile owner.
    pub user_id: Uuid,
    /// Current spendable point balance.
    pub points: i64,
    /// Lifetime points earned. Monotonically non-decreasing.
    pub total_points_earned: i64,
    /// Consecutive activity days including the most recent one.
    pub current_streak: i32,
    /// Longest streak ever reached.
    pub longest_streak: i32,
    /// Date of the most recent point activity.
    pub last_activity_date: Option<NaiveDate>,
    /// Badges pinned on the public profile. At most five, all earned.
    pub featured_badge_ids: Vec<Uuid>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Maximum number of featured badges.
    pub const MAX_FEATURED_BADGES: usize = 5;
}

/// One row of the points leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    /// Position in the leaderboard, starting at 1.
    pub rank: i64,
    /// The ranked user.
    pub user_id: Uuid,
    /// Current spendable point balance.
    pub points: i64,
    /// Lifetime points earned.
    pub total_points_earned: i64,
    /// Consecutive activity days.
    pub current_streak: i32,
}
