//! Course entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A course in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    /// Unique course identifier.
    pub id: Uuid,
    /// The instructor who owns this course.
    pub owner_id: Uuid,
    /// Course title.
    pub title: String,
    /// URL-friendly unique slug.
    pub slug: String,
    /// Price in the smallest currency unit. Zero means free.
    pub price_cents: i64,
    /// Whether the course is visible to learners.
    pub published: bool,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
    /// When the course was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Check if the course costs nothing.
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// Check if the given user is the course owner.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourse {
    /// The instructor creating the course.
    pub owner_id: Uuid,
    /// Course title.
    pub title: String,
    /// URL-friendly unique slug.
    pub slug: String,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
}
