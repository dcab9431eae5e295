//! Course and chapter repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::{PageRequest, PageResponse};
use learnhub_entity::course::chapter::{Chapter, CreateChapter};
use learnhub_entity::course::model::{Course, CreateCourse};

/// Repository for the course catalog.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a course. A duplicate slug maps to a conflict error.
    pub async fn create(&self, data: &CreateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (owner_id, title, slug, price_cents) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(&data.title)
        .bind(&data.slug)
        .bind(data.price_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Course slug '{}' is already taken", data.slug))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create course", e),
        })
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course", e))
    }

    /// List courses, newest first.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Course>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count courses", e))?;

        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list courses", e))?;

        Ok(PageResponse::new(
            courses,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a chapter.
    pub async fn create_chapter(&self, data: &CreateChapter) -> AppResult<Chapter> {
        sqlx::query_as::<_, Chapter>(
            "INSERT INTO chapters (course_id, title, position) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.course_id)
        .bind(&data.title)
        .bind(data.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create chapter", e))
    }

    /// Find a chapter by ID.
    pub async fn find_chapter_by_id(&self, id: Uuid) -> AppResult<Option<Chapter>> {
        sqlx::query_as::<_, Chapter>("SELECT * FROM chapters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find chapter", e))
    }

    /// List a course's chapters in position order.
    pub async fn list_chapters(&self, course_id: Uuid) -> AppResult<Vec<Chapter>> {
        sqlx::query_as::<_, Chapter>(
            "SELECT * FROM chapters WHERE course_id = $1 ORDER BY position ASC",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list chapters", e))
    }
}
