//! Repository implementations for all LearnHub entities.

pub mod comment;
pub mod course;
pub mod gamification;
pub mod purchase;

pub use comment::CommentRepository;
pub use course::CourseRepository;
pub use gamification::GamificationRepository;
pub use purchase::PurchaseRepository;
