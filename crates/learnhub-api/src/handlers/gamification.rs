//! Gamification handlers: points, badges, profiles, leaderboard.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use learnhub_core::error::AppError;
use learnhub_entity::gamification::badge::Badge;
use learnhub_entity::gamification::profile::{LeaderboardEntry, UserProfile};
use learnhub_service::gamification::{AwardOutcome, UserProfileView};

use crate::dto::request::{AwardPointsRequest, CheckBadgeRequest, FeaturedBadgesRequest};
use crate::dto::response::BadgeCheckResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of entries to return (clamped server-side).
    pub limit: Option<i64>,
}

/// POST /api/gamification/points
///
/// Awards points to the calling user. Activity sources inside the server
/// (comment creation) go through the service directly; this endpoint exists
/// for client-driven activities like lesson completion.
pub async fn award_points(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AwardPointsRequest>,
) -> Result<Json<AwardOutcome>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .gamification_service
        .award_points(auth.user_id, req.delta, &req.activity_type, &req.reason)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/gamification/badges/check
pub async fn check_badge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckBadgeRequest>,
) -> Result<Json<BadgeCheckResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let outcome = state
        .gamification_service
        .check_and_award_badge(auth.user_id, &req.key)
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/gamification/badges
pub async fn list_badges(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Badge>>, AppError> {
    let badges = state.gamification_service.list_badges().await?;
    Ok(Json(badges))
}

/// PUT /api/gamification/featured-badges
pub async fn update_featured_badges(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<FeaturedBadgesRequest>,
) -> Result<Json<UserProfile>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let profile = state
        .gamification_service
        .update_featured_badges(auth.user_id, req.badge_ids)
        .await?;
    Ok(Json(profile))
}

/// GET /api/gamification/leaderboard?limit=
pub async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = state.gamification_service.leaderboard(query.limit).await?;
    Ok(Json(entries))
}

/// GET /api/gamification/profiles/me
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfileView>, AppError> {
    let view = state.gamification_service.get_profile(auth.user_id).await?;
    Ok(Json(view))
}

/// GET /api/gamification/profiles/{user_id}
pub async fn user_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfileView>, AppError> {
    let view = state.gamification_service.get_profile(user_id).await?;
    Ok(Json(view))
}
