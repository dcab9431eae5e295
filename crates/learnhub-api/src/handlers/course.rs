//! Course and chapter catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use learnhub_core::error::AppError;
use learnhub_core::types::pagination::PageResponse;
use learnhub_entity::course::chapter::Chapter;
use learnhub_entity::course::model::Course;

use crate::dto::request::{CreateChapterRequest, CreateCourseRequest};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let course = state
        .course_service
        .create_course(&auth, &req.title, &req.slug, req.price_cents)
        .await?;
    Ok(Json(course))
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<Course>>, AppError> {
    let page = params.into_page_request();
    let courses = state.course_service.list_courses(&page).await?;
    Ok(Json(courses))
}

/// GET /api/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    let course = state.course_service.get_course(course_id).await?;
    Ok(Json(course))
}

/// POST /api/courses/{id}/chapters
pub async fn create_chapter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<Chapter>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let chapter = state
        .course_service
        .create_chapter(&auth, course_id, &req.title, req.position)
        .await?;
    Ok(Json(chapter))
}

/// GET /api/courses/{id}/chapters
pub async fn list_chapters(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Chapter>>, AppError> {
    let chapters = state.course_service.list_chapters(course_id).await?;
    Ok(Json(chapters))
}
