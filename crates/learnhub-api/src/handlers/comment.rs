//! Chapter comment and moderation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use learnhub_core::error::AppError;
use learnhub_core::types::pagination::PageResponse;
use learnhub_entity::comment::model::Comment;
use learnhub_entity::comment::thread::CommentThread;

use crate::dto::request::{CreateCommentRequest, ReportCommentRequest, UpdateCommentRequest};
use crate::dto::response::MessageResponse;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/chapters/{chapter_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(chapter_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comment = state
        .comment_service
        .create_chapter_comment(&auth, chapter_id, &req.body, req.parent_id)
        .await?;
    Ok(Json(comment))
}

/// GET /api/chapters/{chapter_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(chapter_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<CommentThread>>, AppError> {
    let page = params.into_page_request();
    let threads = state
        .comment_service
        .list_chapter_threads(chapter_id, &page)
        .await?;
    Ok(Json(threads))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comment = state
        .comment_service
        .update_comment(&auth, comment_id, &req.body)
        .await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .comment_service
        .delete_comment(&auth, comment_id)
        .await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}

/// POST /api/comments/{id}/report
pub async fn report_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<ReportCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comment = state
        .comment_service
        .report_comment(&auth, comment_id, &req.reason)
        .await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/{id}/report
pub async fn dismiss_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<Comment>, AppError> {
    let comment = state
        .comment_service
        .dismiss_report(&auth, comment_id)
        .await?;
    Ok(Json(comment))
}

/// GET /api/courses/{course_id}/comments/reported
pub async fn list_reported(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<Comment>>, AppError> {
    let page = params.into_page_request();
    let comments = state
        .comment_service
        .list_reported(&auth, course_id, &page)
        .await?;
    Ok(Json(comments))
}
