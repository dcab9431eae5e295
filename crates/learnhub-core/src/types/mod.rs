//! Shared value types: typed identifiers and pagination.

pub mod id;
pub mod pagination;

pub use id::{BadgeId, ChapterId, CommentId, CourseId, PurchaseId, UserId};
pub use pagination::{PageRequest, PageResponse};
