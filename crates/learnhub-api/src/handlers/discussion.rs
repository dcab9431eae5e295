//! Course-level discussion handlers.
//!
//! Discussions share the comment entity and threading rules but live at
//! course scope and are never broadcast.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use learnhub_core::error::AppError;
use learnhub_core::types::pagination::PageResponse;
use learnhub_entity::comment::model::Comment;
use learnhub_entity::comment::thread::CommentThread;

use crate::dto::request::CreateCommentRequest;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/courses/{course_id}/discussions
pub async fn create_discussion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comment = state
        .comment_service
        .create_discussion(&auth, course_id, &req.body, req.parent_id)
        .await?;
    Ok(Json(comment))
}

/// GET /api/courses/{course_id}/discussions
pub async fn list_discussions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<CommentThread>>, AppError> {
    let page = params.into_page_request();
    let threads = state
        .comment_service
        .list_discussions(course_id, &page)
        .await?;
    Ok(Json(threads))
}
