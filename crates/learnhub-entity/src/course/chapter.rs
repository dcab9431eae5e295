//! Chapter entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chapter within a course. Chapters anchor comment threads and the
/// realtime channels learners subscribe to while watching.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    /// Unique chapter identifier.
    pub id: Uuid,
    /// The course this chapter belongs to.
    pub course_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Ordering position within the course.
    pub position: i32,
    /// Whether the chapter is visible to learners.
    pub published: bool,
    /// When the chapter was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChapter {
    /// The course the chapter belongs to.
    pub course_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Ordering position within the course.
    pub position: i32,
}
