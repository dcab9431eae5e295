//! Business logic layer for LearnHub.
//!
//! Services compose repositories from `learnhub-database` with the realtime
//! engine from `learnhub-realtime`. Handlers in `learnhub-api` call into this
//! crate and never touch the database directly. Every operation that acts on
//! behalf of a user takes a [`RequestContext`] carrying the caller's identity.

pub mod comment;
pub mod context;
pub mod course;
pub mod gamification;
pub mod purchase;

pub use comment::CommentService;
pub use context::RequestContext;
pub use course::CourseService;
pub use gamification::{AwardOutcome, BadgeCheckOutcome, GamificationService, UserProfileView};
pub use purchase::{PurchaseOutcome, PurchaseService, WebhookOutcome, WebhookVerifier};
