//! Gamification repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::gamification::activity::PointActivity;
use learnhub_entity::gamification::badge::{Badge, EarnedBadge};
use learnhub_entity::gamification::profile::{LeaderboardEntry, UserProfile};

/// Repository for the point ledger, profiles, and badges.
///
/// Ledger appends and profile projection updates happen in one
/// transaction. The profile row is locked for the duration so concurrent
/// awards to the same user serialize instead of losing updates.
#[derive(Debug, Clone)]
pub struct GamificationRepository {
    pool: PgPool,
}

impl GamificationRepository {
    /// Create a new gamification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user ID.
    pub async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    /// Fetch a profile, creating a zeroed one on first touch.
    pub async fn ensure_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create profile", e))?;

        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch profile", e))
    }

    /// Append a ledger entry and update the profile projection atomically.
    ///
    /// `points` moves by the full delta; `total_points_earned` only by a
    /// positive delta, so it never decreases. Streaks advance by activity
    /// date: same day keeps, next day increments, a gap resets to 1.
    pub async fn award(
        &self,
        user_id: Uuid,
        delta: i64,
        activity_type: &str,
        reason: &str,
        today: NaiveDate,
    ) -> AppResult<(PointActivity, UserProfile)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin award", e))?;

        sqlx::query(
            "INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create profile", e))?;

        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM user_profiles WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock profile", e))?;

        let current_streak = match profile.last_activity_date {
            Some(last) if last == today => profile.current_streak,
            Some(last) if last.succ_opt() == Some(today) => profile.current_streak + 1,
            _ => 1,
        };
        let longest_streak = profile.longest_streak.max(current_streak);

        let updated = sqlx::query_as::<_, UserProfile>(
            "UPDATE user_profiles SET \
                points = points + $2, \
                total_points_earned = total_points_earned + $3, \
                current_streak = $4, \
                longest_streak = $5, \
                last_activity_date = $6, \
                updated_at = NOW() \
             WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(delta)
        .bind(delta.max(0))
        .bind(current_streak)
        .bind(longest_streak)
        .bind(today)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update profile", e))?;

        let activity = sqlx::query_as::<_, PointActivity>(
            "INSERT INTO point_activities (user_id, points, activity_type, reason) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(delta)
        .bind(activity_type)
        .bind(reason)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append activity", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit award", e))?;

        Ok((activity, updated))
    }

    /// Find a badge by its stable key.
    pub async fn find_badge_by_key(&self, key: &str) -> AppResult<Option<Badge>> {
        sqlx::query_as::<_, Badge>("SELECT * FROM badges WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find badge", e))
    }

    /// List the badge catalog.
    pub async fn list_badges(&self) -> AppResult<Vec<Badge>> {
        sqlx::query_as::<_, Badge>("SELECT * FROM badges ORDER BY tier, points_threshold, name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list badges", e))
    }

    /// Grant a badge idempotently. Returns whether this call granted it.
    ///
    /// A user's first badge seeds their featured list.
    pub async fn grant_badge(&self, user_id: Uuid, badge_id: Uuid) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin grant", e))?;

        let inserted = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, badge_id) DO NOTHING RETURNING badge_id",
        )
        .bind(user_id)
        .bind(badge_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant badge", e))?;

        let newly_granted = inserted.is_some();
        if newly_granted {
            sqlx::query(
                "INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create profile", e)
            })?;

            sqlx::query(
                "UPDATE user_profiles SET featured_badge_ids = ARRAY[$2], updated_at = NOW() \
                 WHERE user_id = $1 AND cardinality(featured_badge_ids) = 0",
            )
            .bind(user_id)
            .bind(badge_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to seed featured badges", e)
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit grant", e))?;

        Ok(newly_granted)
    }

    /// List a user's earned badges, oldest first.
    pub async fn list_earned_badges(&self, user_id: Uuid) -> AppResult<Vec<EarnedBadge>> {
        sqlx::query_as::<_, EarnedBadge>(
            "SELECT b.id, b.key, b.name, b.description, b.tier, b.points_threshold, ub.earned_at \
             FROM user_badges ub \
             JOIN badges b ON b.id = ub.badge_id \
             WHERE ub.user_id = $1 \
             ORDER BY ub.earned_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list earned badges", e))
    }

    /// Count how many of the given badges the user has earned.
    pub async fn count_owned(&self, user_id: Uuid, badge_ids: &[Uuid]) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_badges WHERE user_id = $1 AND badge_id = ANY($2)",
        )
        .bind(user_id)
        .bind(badge_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count owned badges", e))
    }

    /// Replace the featured badge list whole.
    pub async fn set_featured(
        &self,
        user_id: Uuid,
        badge_ids: &[Uuid],
    ) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "UPDATE user_profiles SET featured_badge_ids = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(badge_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to set featured badges", e)
        })
    }

    /// Top profiles by spendable points. Ties break on user id so the
    /// ordering is stable.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT ROW_NUMBER() OVER (ORDER BY points DESC, user_id) AS rank, \
                    user_id, points, total_points_earned, current_streak \
             FROM user_profiles \
             ORDER BY points DESC, user_id \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load leaderboard", e))
    }
}
