//! Gamification configuration.

use serde::{Deserialize, Serialize};

/// Point awards and ledger limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationConfig {
    /// Points awarded for posting a chapter comment.
    #[serde(default = "default_comment_points")]
    pub comment_points: i64,
    /// Points awarded for opening a course discussion.
    #[serde(default = "default_discussion_points")]
    pub discussion_points: i64,
    /// Upper bound on the absolute value of a single ledger entry.
    #[serde(default = "default_max_award_per_call")]
    pub max_award_per_call: i64,
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            comment_points: default_comment_points(),
            discussion_points: default_discussion_points(),
            max_award_per_call: default_max_award_per_call(),
        }
    }
}

fn default_comment_points() -> i64 {
    5
}

fn default_discussion_points() -> i64 {
    10
}

fn default_max_award_per_call() -> i64 {
    1000
}
