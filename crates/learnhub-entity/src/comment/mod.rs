//! Comment domain entities.

pub mod model;
pub mod moderation;
pub mod thread;

pub use model::{Comment, CommentRow, CreateComment};
pub use moderation::ReportRecord;
pub use thread::CommentThread;
