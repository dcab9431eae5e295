//! Comment thread view.

use serde::{Deserialize, Serialize};

use crate::comment::model::Comment;

/// A top-level comment with its replies eagerly loaded.
///
/// Thread listings return parents newest-first and each parent's replies
/// oldest-first, so a page of threads reads top-down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    /// The top-level comment.
    pub comment: Comment,
    /// Replies in chronological order.
    pub replies: Vec<Comment>,
}

impl CommentThread {
    /// Total number of comments in the thread, parent included.
    pub fn total_comments(&self) -> usize {
        1 + self.replies.len()
    }
}
