//! The publisher seam between the service layer and the socket fanout.
//!
//! Services broadcast through [`EventPublisher`], which wraps any
//! [`ChannelPublisher`]. Publishing is fire-and-forget at every level:
//! nothing here returns an error and a failed delivery only produces a
//! log line.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use learnhub_core::types::ChapterId;
use learnhub_entity::comment::model::Comment;

use crate::channel::types::ChannelKind;

/// A new top-level comment was posted on a chapter.
pub const COMMENT_NEW: &str = "comment:new";
/// A reply was posted on a chapter.
pub const COMMENT_REPLY: &str = "comment:reply";
/// A comment's text was edited.
pub const COMMENT_UPDATE: &str = "comment:update";
/// A comment was deleted.
pub const COMMENT_DELETE: &str = "comment:delete";
/// Someone is typing in a chapter's comment box.
pub const USER_TYPING: &str = "user:typing";
/// Presence snapshot delivered to a joining subscriber.
pub const PRESENCE_SUBSCRIPTION_SUCCEEDED: &str = "presence:subscription_succeeded";
/// A member appeared on a presence channel.
pub const PRESENCE_MEMBER_ADDED: &str = "presence:member_added";
/// A member's last connection left a presence channel.
pub const PRESENCE_MEMBER_REMOVED: &str = "presence:member_removed";

/// Anything that can push an event to a named channel's subscribers.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Push one event. Must not fail the caller; delivery problems are
    /// the publisher's to log and swallow.
    async fn publish(&self, channel: &str, event: &str, data: serde_json::Value);
}

/// Domain-event publisher the service layer holds.
#[derive(Clone)]
pub struct EventPublisher {
    publisher: Arc<dyn ChannelPublisher>,
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher").finish()
    }
}

impl EventPublisher {
    /// Create a new event publisher.
    pub fn new(publisher: Arc<dyn ChannelPublisher>) -> Self {
        Self { publisher }
    }

    /// A top-level comment was created on a chapter.
    pub async fn comment_created(&self, chapter_id: ChapterId, comment: &Comment) {
        self.publish_comment(chapter_id, COMMENT_NEW, comment).await;
    }

    /// A reply was created on a chapter.
    pub async fn comment_reply(&self, chapter_id: ChapterId, comment: &Comment) {
        self.publish_comment(chapter_id, COMMENT_REPLY, comment).await;
    }

    /// A comment's text was edited.
    pub async fn comment_updated(&self, chapter_id: ChapterId, comment: &Comment) {
        self.publish_comment(chapter_id, COMMENT_UPDATE, comment).await;
    }

    /// A comment was deleted.
    pub async fn comment_deleted(&self, chapter_id: ChapterId, comment_id: Uuid) {
        let channel = ChannelKind::ChapterComments(chapter_id).name();
        self.publisher
            .publish(
                &channel,
                COMMENT_DELETE,
                serde_json::json!({
                    "id": comment_id,
                    "chapter_id": chapter_id,
                }),
            )
            .await;
    }

    async fn publish_comment(&self, chapter_id: ChapterId, event: &str, comment: &Comment) {
        let channel = ChannelKind::ChapterComments(chapter_id).name();
        match serde_json::to_value(comment) {
            Ok(data) => self.publisher.publish(&channel, event, data).await,
            Err(e) => {
                tracing::warn!(
                    comment_id = %comment.id,
                    event = %event,
                    error = %e,
                    "Failed to serialize comment event"
                );
            }
        }
    }
}
