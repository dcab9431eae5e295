//! Comment threads, discussions, and moderation.

pub mod service;

pub use service::CommentService;
