//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::comment::moderation::ReportRecord;

/// A comment on a chapter, or a course-level discussion post.
///
/// Every comment belongs to a course. A comment with a `chapter_id` lives
/// in that chapter's thread list; a comment without one is a course-level
/// discussion. Threading is one level deep: a reply's parent must itself
/// be a top-level comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The course this comment belongs to.
    pub course_id: Uuid,
    /// The chapter scope, or `None` for course-level discussions.
    pub chapter_id: Option<Uuid>,
    /// Parent comment for replies. Always a top-level comment.
    pub parent_id: Option<Uuid>,
    /// The user who wrote the comment.
    pub author_id: Uuid,
    /// Comment text.
    pub body: String,
    /// Open moderation report, if any.
    pub report: Option<ReportRecord>,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment text was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Check if this comment is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Check if this comment is a course-level discussion post.
    pub fn is_discussion(&self) -> bool {
        self.chapter_id.is_none()
    }

    /// Check if this comment has an open report.
    pub fn is_reported(&self) -> bool {
        self.report.is_some()
    }

    /// Only the author may edit the text.
    pub fn can_edit(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// The author, the course owner, and admins may delete.
    pub fn can_delete(&self, user_id: Uuid, course_owner_id: Uuid, is_admin: bool) -> bool {
        self.author_id == user_id || course_owner_id == user_id || is_admin
    }

    /// Anyone but the author may report.
    pub fn can_report(&self, user_id: Uuid) -> bool {
        self.author_id != user_id
    }
}

/// Raw database row for a comment. The report lives in a nullable JSONB
/// column; [`Comment`] unwraps the `Json` wrapper for the domain layer.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub chapter_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub author_id: Uuid,
    pub body: String,
    pub report: Option<sqlx::types::Json<ReportRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            chapter_id: row.chapter_id,
            parent_id: row.parent_id,
            author_id: row.author_id,
            body: row.body,
            report: row.report.map(|json| json.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Data required to create a new comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// The course the comment belongs to.
    pub course_id: Uuid,
    /// Chapter scope, or `None` for a course-level discussion.
    pub chapter_id: Option<Uuid>,
    /// Parent comment for replies.
    pub parent_id: Option<Uuid>,
    /// The comment author.
    pub author_id: Uuid,
    /// Comment text, already trimmed and length-checked.
    pub body: String,
}
