//! Course catalog service.
//!
//! Courses and chapters are the scaffolding the purchase, comment, and
//! gamification flows hang off. Authoring stays deliberately small: create,
//! fetch, list.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::{PageRequest, PageResponse};
use learnhub_database::repositories::CourseRepository;
use learnhub_entity::course::chapter::{Chapter, CreateChapter};
use learnhub_entity::course::model::{Course, CreateCourse};

use crate::context::RequestContext;

const MAX_TITLE_CHARS: usize = 200;

/// Service for course and chapter management.
#[derive(Debug, Clone)]
pub struct CourseService {
    course_repo: Arc<CourseRepository>,
}

impl CourseService {
    pub fn new(course_repo: Arc<CourseRepository>) -> Self {
        Self { course_repo }
    }

    /// Create a course owned by the caller.
    pub async fn create_course(
        &self,
        ctx: &RequestContext,
        title: &str,
        slug: &str,
        price_cents: i64,
    ) -> AppResult<Course> {
        let title = normalize_title(title)?;
        let slug = normalize_slug(slug)?;
        if price_cents < 0 {
            return Err(AppError::validation("Course price cannot be negative"));
        }

        let course = self
            .course_repo
            .create(&CreateCourse {
                owner_id: ctx.user_id,
                title,
                slug,
                price_cents,
            })
            .await?;

        info!(
            course_id = %course.id,
            owner_id = %ctx.user_id,
            slug = %course.slug,
            "Course created"
        );

        Ok(course)
    }

    /// Fetch a single course.
    pub async fn get_course(&self, course_id: Uuid) -> AppResult<Course> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }

    /// List courses, newest first.
    pub async fn list_courses(&self, page: &PageRequest) -> AppResult<PageResponse<Course>> {
        self.course_repo.list(page).await
    }

    /// Add a chapter to a course. Only the course owner or an admin may author
    /// chapters.
    pub async fn create_chapter(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
        title: &str,
        position: i32,
    ) -> AppResult<Chapter> {
        let title = normalize_title(title)?;
        if position < 0 {
            return Err(AppError::validation("Chapter position cannot be negative"));
        }

        let course = self.get_course(course_id).await?;
        if !course.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::unauthorized(
                "Only the course owner can add chapters",
            ));
        }

        let chapter = self
            .course_repo
            .create_chapter(&CreateChapter {
                course_id,
                title,
                position,
            })
            .await?;

        info!(
            chapter_id = %chapter.id,
            course_id = %course_id,
            user_id = %ctx.user_id,
            "Chapter created"
        );

        Ok(chapter)
    }

    /// Fetch a single chapter.
    pub async fn get_chapter(&self, chapter_id: Uuid) -> AppResult<Chapter> {
        self.course_repo
            .find_chapter_by_id(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter not found"))
    }

    /// List a course's chapters in reading order.
    pub async fn list_chapters(&self, course_id: Uuid) -> AppResult<Vec<Chapter>> {
        // 404 for an unknown course rather than an empty list.
        self.get_course(course_id).await?;
        self.course_repo.list_chapters(course_id).await
    }
}

fn normalize_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::validation(format!(
            "Title exceeds {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_slug(slug: &str) -> AppResult<String> {
    let normalized = slug.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::validation("Slug is required"));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(AppError::validation(
            "Slug may only contain letters, digits, and hyphens",
        ));
    }
    Ok(normalized)
}
