//! Request DTOs with validation rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create course request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCourseRequest {
    /// Course title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// URL slug, unique across courses.
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    /// Price in cents. Zero makes the course free.
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

/// Create chapter request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChapterRequest {
    /// Chapter title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Position within the course reading order.
    #[validate(range(min = 0))]
    pub position: i32,
}

/// Create comment or discussion request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment text.
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
    /// Top-level comment this replies to, if any.
    pub parent_id: Option<Uuid>,
}

/// Edit comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    /// Replacement text.
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// Report comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportCommentRequest {
    /// Why the comment is being reported.
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Award points request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AwardPointsRequest {
    /// Signed point delta. Bounds are enforced against configuration.
    pub delta: i64,
    /// Activity identifier, e.g. `lesson.completed`.
    #[validate(length(min = 1, max = 100))]
    pub activity_type: String,
    /// Human-readable reason stored on the ledger entry.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: String,
}

/// Badge check request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckBadgeRequest {
    /// Stable badge key, e.g. `community_contributor`.
    #[validate(length(min = 1, max = 100))]
    pub key: String,
}

/// Featured badges replacement request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeaturedBadgesRequest {
    /// Badge ids to feature, in display order. Empty clears the selection.
    #[validate(length(max = 5))]
    pub badge_ids: Vec<Uuid>,
}
