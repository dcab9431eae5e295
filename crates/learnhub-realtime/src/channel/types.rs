//! Channel name definitions and parsing.

use learnhub_core::types::ChapterId;

/// Typed channel identifiers.
///
/// Channel names are part of the client protocol and must not change:
/// `chapter-{id}-comments`, `chapter-{id}-typing`,
/// `presence-chapter-{id}`, `presence-global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Comment events for one chapter.
    ChapterComments(ChapterId),
    /// Typing indicators for one chapter.
    ChapterTyping(ChapterId),
    /// Who is viewing one chapter.
    PresenceChapter(ChapterId),
    /// Who is online anywhere on the platform.
    PresenceGlobal,
}

impl ChannelKind {
    /// Parse a channel string into a typed channel.
    pub fn parse(channel: &str) -> Option<Self> {
        if channel == "presence-global" {
            return Some(Self::PresenceGlobal);
        }
        if let Some(id) = channel.strip_prefix("presence-chapter-") {
            return id.parse().ok().map(Self::PresenceChapter);
        }
        if let Some(rest) = channel.strip_prefix("chapter-") {
            if let Some(id) = rest.strip_suffix("-comments") {
                return id.parse().ok().map(Self::ChapterComments);
            }
            if let Some(id) = rest.strip_suffix("-typing") {
                return id.parse().ok().map(Self::ChapterTyping);
            }
        }
        None
    }

    /// The channel's wire name.
    pub fn name(&self) -> String {
        match self {
            Self::ChapterComments(id) => format!("chapter-{id}-comments"),
            Self::ChapterTyping(id) => format!("chapter-{id}-typing"),
            Self::PresenceChapter(id) => format!("presence-chapter-{id}"),
            Self::PresenceGlobal => "presence-global".to_string(),
        }
    }

    /// Whether subscribing to this channel implies presence membership.
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::PresenceChapter(_) | Self::PresenceGlobal)
    }
}
