//! Gamification service.
//!
//! The points ledger is append-only; the profile row is a projection kept in
//! step with it inside a single transaction by the repository. Spending
//! points lowers the balance but never `total_points_earned`, which is what
//! badge thresholds read. Streaks count consecutive UTC activity days.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use learnhub_core::config::GamificationConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_database::repositories::GamificationRepository;
use learnhub_entity::gamification::activity::PointActivity;
use learnhub_entity::gamification::badge::{Badge, EarnedBadge};
use learnhub_entity::gamification::profile::{LeaderboardEntry, UserProfile};

const DEFAULT_LEADERBOARD_SIZE: i64 = 10;
const MAX_LEADERBOARD_SIZE: i64 = 100;

/// A ledger entry together with the profile state after applying it.
#[derive(Debug, Clone, Serialize)]
pub struct AwardOutcome {
    pub activity: PointActivity,
    pub profile: UserProfile,
}

/// Result of checking a badge for a user.
#[derive(Debug, Clone)]
pub enum BadgeCheckOutcome {
    /// The badge was granted by this call.
    Granted(Badge),
    /// The user already held the badge. Idempotent success.
    AlreadyHeld(Badge),
    /// The badge has a points threshold the user has not reached.
    BelowThreshold {
        badge: Badge,
        required: i64,
        current: i64,
    },
}

/// A profile with the badges backing it.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileView {
    pub profile: UserProfile,
    pub badges: Vec<EarnedBadge>,
}

/// Service for the points ledger, badges, and leaderboard.
#[derive(Debug, Clone)]
pub struct GamificationService {
    gamification_repo: Arc<GamificationRepository>,
    config: GamificationConfig,
}

impl GamificationService {
    pub fn new(gamification_repo: Arc<GamificationRepository>, config: GamificationConfig) -> Self {
        Self {
            gamification_repo,
            config,
        }
    }

    /// Append a ledger entry and update the profile projection.
    ///
    /// `delta` may be negative (spending); the profile's points balance can
    /// reach zero but `total_points_earned` only ever grows.
    pub async fn award_points(
        &self,
        user_id: Uuid,
        delta: i64,
        activity_type: &str,
        reason: &str,
    ) -> AppResult<AwardOutcome> {
        if delta == 0 {
            return Err(AppError::validation("Point delta must be non-zero"));
        }
        if delta.abs() > self.config.max_award_per_call {
            return Err(AppError::validation(format!(
                "Point delta exceeds the per-call limit of {}",
                self.config.max_award_per_call
            )));
        }
        if activity_type.trim().is_empty() {
            return Err(AppError::validation("Activity type is required"));
        }

        let today = Utc::now().date_naive();
        let (activity, profile) = self
            .gamification_repo
            .award(user_id, delta, activity_type, reason, today)
            .await?;

        info!(
            user_id = %user_id,
            delta = delta,
            activity_type = %activity_type,
            points = profile.points,
            current_streak = profile.current_streak,
            "Points awarded"
        );

        Ok(AwardOutcome { activity, profile })
    }

    /// Grant a badge if its threshold is met. Granting is idempotent: a badge
    /// the user already holds reports [`BadgeCheckOutcome::AlreadyHeld`]
    /// without touching the database rows.
    pub async fn check_and_award_badge(
        &self,
        user_id: Uuid,
        badge_key: &str,
    ) -> AppResult<BadgeCheckOutcome> {
        let badge = self
            .gamification_repo
            .find_badge_by_key(badge_key)
            .await?
            .ok_or_else(|| AppError::not_found("Badge not found"))?;

        let profile = self.gamification_repo.ensure_profile(user_id).await?;
        if !badge.threshold_met(profile.total_points_earned) {
            return Ok(BadgeCheckOutcome::BelowThreshold {
                required: badge.points_threshold.unwrap_or(0),
                current: profile.total_points_earned,
                badge,
            });
        }

        let granted = self
            .gamification_repo
            .grant_badge(user_id, badge.id)
            .await?;

        if granted {
            info!(user_id = %user_id, badge_key = %badge_key, "Badge granted");
            Ok(BadgeCheckOutcome::Granted(badge))
        } else {
            Ok(BadgeCheckOutcome::AlreadyHeld(badge))
        }
    }

    /// Replace the featured badge selection.
    ///
    /// All-or-nothing: every id must name a badge the user has earned, the
    /// list must be duplicate-free, and at most
    /// [`UserProfile::MAX_FEATURED_BADGES`] entries are allowed. An empty
    /// list clears the selection.
    pub async fn update_featured_badges(
        &self,
        user_id: Uuid,
        badge_ids: Vec<Uuid>,
    ) -> AppResult<UserProfile> {
        if badge_ids.len() > UserProfile::MAX_FEATURED_BADGES {
            return Err(AppError::validation(format!(
                "At most {} featured badges are allowed",
                UserProfile::MAX_FEATURED_BADGES
            )));
        }

        let mut seen = std::collections::HashSet::new();
        if !badge_ids.iter().all(|id| seen.insert(*id)) {
            return Err(AppError::validation("Featured badge list contains duplicates"));
        }

        self.gamification_repo.ensure_profile(user_id).await?;

        let owned = self
            .gamification_repo
            .count_owned(user_id, &badge_ids)
            .await?;
        if owned as usize != badge_ids.len() {
            return Err(AppError::validation(
                "Featured badges must all be earned by the user",
            ));
        }

        let profile = self
            .gamification_repo
            .set_featured(user_id, &badge_ids)
            .await?;

        info!(
            user_id = %user_id,
            featured = badge_ids.len(),
            "Featured badges updated"
        );

        Ok(profile)
    }

    /// A user's profile with earned badges. Creates the profile row on first
    /// read so new users always see a zeroed profile instead of a 404.
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfileView> {
        let profile = self.gamification_repo.ensure_profile(user_id).await?;
        let badges = self.gamification_repo.list_earned_badges(user_id).await?;
        Ok(UserProfileView { profile, badges })
    }

    /// All badge definitions.
    pub async fn list_badges(&self) -> AppResult<Vec<Badge>> {
        self.gamification_repo.list_badges().await
    }

    /// Top profiles by points balance.
    pub async fn leaderboard(&self, limit: Option<i64>) -> AppResult<Vec<LeaderboardEntry>> {
        let limit = limit
            .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
            .clamp(1, MAX_LEADERBOARD_SIZE);
        self.gamification_repo.leaderboard(limit).await
    }

    /// Configured award for posting a chapter comment.
    pub fn comment_points(&self) -> i64 {
        self.config.comment_points
    }

    /// Configured award for starting a course discussion.
    pub fn discussion_points(&self) -> i64 {
        self.config.discussion_points
    }
}
