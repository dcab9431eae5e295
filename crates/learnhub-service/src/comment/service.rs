//! Comment service.
//!
//! Comments come in two scopes sharing one table: chapter comments
//! (`chapter_id` set) and course discussions (`chapter_id` NULL). Threading
//! is one level deep; a reply can only target a top-level comment in the
//! same scope. Chapter activity is broadcast to realtime subscribers,
//! discussions are not. Point awards after a create are best-effort and
//! never fail the mutation that triggered them.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::types::id::ChapterId;
use learnhub_core::types::pagination::{PageRequest, PageResponse};
use learnhub_database::repositories::{CommentRepository, CourseRepository};
use learnhub_entity::comment::model::{Comment, CreateComment};
use learnhub_entity::comment::moderation::ReportRecord;
use learnhub_entity::comment::thread::CommentThread;
use learnhub_realtime::EventPublisher;

use crate::context::RequestContext;
use crate::gamification::GamificationService;

const MAX_BODY_CHARS: usize = 2000;
const MAX_REASON_CHARS: usize = 500;

/// Badge for a user's first comment or discussion.
const FIRST_POST_BADGE: &str = "first_steps";

/// Service for comment creation, threading, and moderation.
#[derive(Debug, Clone)]
pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    course_repo: Arc<CourseRepository>,
    gamification: Arc<GamificationService>,
    events: EventPublisher,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<CommentRepository>,
        course_repo: Arc<CourseRepository>,
        gamification: Arc<GamificationService>,
        events: EventPublisher,
    ) -> Self {
        Self {
            comment_repo,
            course_repo,
            gamification,
            events,
        }
    }

    /// Create a comment under a chapter, optionally as a reply to a
    /// top-level comment in the same chapter.
    pub async fn create_chapter_comment(
        &self,
        ctx: &RequestContext,
        chapter_id: Uuid,
        body: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Comment> {
        let chapter = self
            .course_repo
            .find_chapter_by_id(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter not found"))?;

        let comment = self
            .create_in_scope(
                ctx,
                chapter.course_id,
                Some(chapter_id),
                body,
                parent_id,
            )
            .await?;

        let channel_chapter = ChapterId::from_uuid(chapter_id);
        if comment.is_reply() {
            self.events.comment_reply(channel_chapter, &comment).await;
        } else {
            self.events.comment_created(channel_chapter, &comment).await;
        }

        self.award_for_post(ctx.user_id, false).await;
        Ok(comment)
    }

    /// Create a course-level discussion post, optionally as a reply.
    /// Discussions are not broadcast.
    pub async fn create_discussion(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
        body: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Comment> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        let comment = self
            .create_in_scope(ctx, course_id, None, body, parent_id)
            .await?;

        self.award_for_post(ctx.user_id, true).await;
        Ok(comment)
    }

    /// Edit a comment's body. Author only.
    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
        body: &str,
    ) -> AppResult<Comment> {
        let body = normalize_body(body)?;
        let existing = self.get_comment(comment_id).await?;
        if !existing.can_edit(ctx.user_id) {
            return Err(AppError::unauthorized(
                "Only the author can edit a comment",
            ));
        }

        let updated = self
            .comment_repo
            .update_body(comment_id, &body)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        info!(comment_id = %comment_id, user_id = %ctx.user_id, "Comment updated");

        if let Some(chapter_id) = updated.chapter_id {
            self.events
                .comment_updated(ChapterId::from_uuid(chapter_id), &updated)
                .await;
        }

        Ok(updated)
    }

    /// Delete a comment and its replies. Allowed for the author, the course
    /// owner, and admins.
    pub async fn delete_comment(&self, ctx: &RequestContext, comment_id: Uuid) -> AppResult<()> {
        let existing = self.get_comment(comment_id).await?;
        let course = self
            .course_repo
            .find_by_id(existing.course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if !existing.can_delete(ctx.user_id, course.owner_id, ctx.is_admin()) {
            return Err(AppError::unauthorized(
                "Only the author, course owner, or an admin can delete a comment",
            ));
        }

        let removed = self.comment_repo.delete(comment_id).await?;
        info!(
            comment_id = %comment_id,
            user_id = %ctx.user_id,
            rows_removed = removed,
            "Comment deleted"
        );

        if let Some(chapter_id) = existing.chapter_id {
            self.events
                .comment_deleted(ChapterId::from_uuid(chapter_id), existing.id)
                .await;
        }

        Ok(())
    }

    /// Flag a comment for moderation. Authors cannot report their own
    /// comments. Reporting an already-reported comment replaces the record.
    pub async fn report_comment(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
        reason: &str,
    ) -> AppResult<Comment> {
        let reason = normalize_reason(reason)?;
        let existing = self.get_comment(comment_id).await?;
        if !existing.can_report(ctx.user_id) {
            return Err(AppError::unauthorized(
                "You cannot report your own comment",
            ));
        }

        let record = ReportRecord::new(reason, ctx.user_id);
        let updated = self
            .comment_repo
            .set_report(comment_id, &record)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        info!(
            comment_id = %comment_id,
            reported_by = %ctx.user_id,
            "Comment reported"
        );

        Ok(updated)
    }

    /// Clear a comment's report. Course owner or admin only. Dismissing an
    /// unreported comment succeeds without changing anything.
    pub async fn dismiss_report(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
    ) -> AppResult<Comment> {
        let existing = self.get_comment(comment_id).await?;
        let course = self
            .course_repo
            .find_by_id(existing.course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if !course.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::unauthorized(
                "Only the course owner can dismiss reports",
            ));
        }

        let updated = self
            .comment_repo
            .clear_report(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        info!(
            comment_id = %comment_id,
            user_id = %ctx.user_id,
            was_reported = existing.is_reported(),
            "Comment report dismissed"
        );

        Ok(updated)
    }

    /// Threads under a chapter, newest parents first, replies oldest first.
    pub async fn list_chapter_threads(
        &self,
        chapter_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentThread>> {
        self.course_repo
            .find_chapter_by_id(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter not found"))?;
        self.comment_repo.list_chapter_threads(chapter_id, page).await
    }

    /// Course discussion threads, newest parents first.
    pub async fn list_discussions(
        &self,
        course_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CommentThread>> {
        self.course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;
        self.comment_repo.list_discussion_threads(course_id, page).await
    }

    /// Reported comments across a course. Course owner or admin only.
    pub async fn list_reported(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Comment>> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if !course.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::unauthorized(
                "Only the course owner can view reported comments",
            ));
        }

        self.comment_repo.list_reported(course_id, page).await
    }

    async fn get_comment(&self, comment_id: Uuid) -> AppResult<Comment> {
        self.comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// Shared create path for both scopes. The scope key is
    /// `(course_id, chapter_id)`; a parent must sit in the same scope and be
    /// top-level.
    async fn create_in_scope(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
        chapter_id: Option<Uuid>,
        body: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Comment> {
        let body = normalize_body(body)?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent comment not found"))?;
            if parent.is_reply() {
                return Err(AppError::validation(
                    "Replies can only target top-level comments",
                ));
            }
            if parent.course_id != course_id || parent.chapter_id != chapter_id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different thread",
                ));
            }
        }

        let comment = self
            .comment_repo
            .create(&CreateComment {
                course_id,
                chapter_id,
                parent_id,
                author_id: ctx.user_id,
                body,
            })
            .await?;

        info!(
            comment_id = %comment.id,
            course_id = %course_id,
            chapter_id = ?chapter_id,
            user_id = %ctx.user_id,
            is_reply = comment.is_reply(),
            "Comment created"
        );

        Ok(comment)
    }

    /// Award points and check the first-post badge after a create. Failures
    /// here are logged and swallowed; the comment is already committed.
    async fn award_for_post(&self, user_id: Uuid, discussion: bool) {
        let (points, activity_type, reason) = if discussion {
            (
                self.gamification.discussion_points(),
                "discussion.created",
                "Started a course discussion",
            )
        } else {
            (
                self.gamification.comment_points(),
                "comment.created",
                "Posted a chapter comment",
            )
        };

        if points != 0 {
            if let Err(e) = self
                .gamification
                .award_points(user_id, points, activity_type, reason)
                .await
            {
                warn!(user_id = %user_id, error = %e, "Point award failed after comment create");
            }
        }

        if let Err(e) = self
            .gamification
            .check_and_award_badge(user_id, FIRST_POST_BADGE)
            .await
        {
            warn!(user_id = %user_id, error = %e, "Badge check failed after comment create");
        }
    }
}

fn normalize_body(body: &str) -> AppResult<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Comment body is required"));
    }
    if trimmed.chars().count() > MAX_BODY_CHARS {
        return Err(AppError::validation(format!(
            "Comment body exceeds {MAX_BODY_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_reason(reason: &str) -> AppResult<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Report reason is required"));
    }
    if trimmed.chars().count() > MAX_REASON_CHARS {
        return Err(AppError::validation(format!(
            "Report reason exceeds {MAX_REASON_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}
