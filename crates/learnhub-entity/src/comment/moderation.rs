//! Comment moderation report record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open report against a comment.
///
/// A comment is either unreported (no record) or reported (one record).
/// Reporting again overwrites the record whole; dismissing clears it whole.
/// There is no partial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// The reason given by the reporter.
    pub reason: String,
    /// The user who filed the report.
    pub reported_by: Uuid,
    /// When the report was filed.
    pub reported_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn new(reason: impl Into<String>, reported_by: Uuid) -> Self {
        Self {
            reason: reason.into(),
            reported_by,
            reported_at: Utc::now(),
        }
    }
}
