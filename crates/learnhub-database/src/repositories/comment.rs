//! Comment repository implementation.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::types::pagination::{PageRequest, PageResponse};
use learnhub_entity::comment::model::{Comment, CommentRow, CreateComment};
use learnhub_entity::comment::moderation::ReportRecord;
use learnhub_entity::comment::thread::CommentThread;

/// Repository for comments and discussions.
///
/// The report lives in a nullable JSONB column on the comment row, so the
/// moderation state travels with every comment read and clears atomically
/// with a single `SET report = NULL`.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment.
    pub async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        sqlx::query_as::<_, CommentRow>(
            "INSERT INTO comments (course_id, chapter_id, parent_id, author_id, body) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.course_id)
        .bind(data.chapter_id)
        .bind(data.parent_id)
        .bind(data.author_id)
        .bind(&data.body)
        .fetch_one(&self.pool)
        .await
        .map(Comment::from)
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, CommentRow>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Comment::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    /// Replace a comment's body. Returns `None` when the comment is gone.
    pub async fn update_body(&self, id: Uuid, body: &str) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET body = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Comment::from))
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update comment", e))
    }

    /// Delete a comment and its replies. Returns how many rows went away.
    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 OR parent_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete comment", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Attach a report to a comment, overwriting any existing one.
    pub async fn set_report(
        &self,
        id: Uuid,
        record: &ReportRecord,
    ) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET report = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(sqlx::types::Json(record))
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Comment::from))
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to report comment", e))
    }

    /// Clear a comment's report. A no-op when the comment is unreported.
    pub async fn clear_report(&self, id: Uuid) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET report = NULL WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Comment::from))
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to dismiss report", e))
    }

    /// List a chapter's threads, parents newest-first with replies attached.
    pub async fn list_chapter_threads(
        &self,
        chapter_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentThread>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE chapter_id = $1 AND parent_id IS NULL",
        )
        .bind(chapter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comments", e))?;

        let parents = sqlx::query_as::<_, CommentRow>(
            "SELECT * FROM comments WHERE chapter_id = $1 AND parent_id IS NULL \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(chapter_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))?;

        let threads = self.attach_replies(parents).await?;
        Ok(PageResponse::new(
            threads,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a course's discussion threads (comments with no chapter),
    /// parents newest-first with replies attached.
    pub async fn list_discussion_threads(
        &self,
        course_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentThread>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments \
             WHERE course_id = $1 AND chapter_id IS NULL AND parent_id IS NULL",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count discussions", e)
        })?;

        let parents = sqlx::query_as::<_, CommentRow>(
            "SELECT * FROM comments \
             WHERE course_id = $1 AND chapter_id IS NULL AND parent_id IS NULL \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(course_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list discussions", e))?;

        let threads = self.attach_replies(parents).await?;
        Ok(PageResponse::new(
            threads,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a course's reported comments, newest first.
    pub async fn list_reported(
        &self,
        course_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Comment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE course_id = $1 AND report IS NOT NULL",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count reported", e))?;

        let comments = sqlx::query_as::<_, CommentRow>(
            "SELECT * FROM comments WHERE course_id = $1 AND report IS NOT NULL \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(course_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reported comments", e)
        })?;

        Ok(PageResponse::new(
            comments.into_iter().map(Comment::from).collect(),
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Load all replies for the given parents in one query and group them,
    /// oldest-first within each thread.
    async fn attach_replies(&self, parents: Vec<CommentRow>) -> AppResult<Vec<CommentThread>> {
        let parent_ids: Vec<Uuid> = parents.iter().map(|row| row.id).collect();
        let replies = if parent_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, CommentRow>(
                "SELECT * FROM comments WHERE parent_id = ANY($1) ORDER BY created_at ASC",
            )
            .bind(&parent_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list replies", e))?
        };

        let mut by_parent: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in replies {
            let reply = Comment::from(row);
            if let Some(parent_id) = reply.parent_id {
                by_parent.entry(parent_id).or_default().push(reply);
            }
        }

        Ok(parents
            .into_iter()
            .map(Comment::from)
            .map(|comment| {
                let replies = by_parent.remove(&comment.id).unwrap_or_default();
                CommentThread { comment, replies }
            })
            .collect())
    }
}
