//! Presence registry: who is on which presence channel.

use std::collections::HashMap;

use dashmap::DashMap;

use learnhub_core::types::UserId;

/// Per-channel presence membership with per-user reference counts.
///
/// A user with several connections on the same channel is one member;
/// the count tracks their connections so the member only disappears when
/// the last one leaves. Counts never go below zero and a leave for an
/// untracked user is a no-op. Everything lives in memory: on restart the
/// state is empty and clients repopulate it by resubscribing.
#[derive(Debug)]
pub struct PresenceRegistry {
    /// Channel name → user → connection count.
    members: DashMap<String, HashMap<UserId, u32>>,
}

impl PresenceRegistry {
    /// Create a new presence registry.
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
        }
    }

    /// Count a user onto a channel. Returns true when this made them a
    /// member (their first connection there).
    pub fn join(&self, channel: &str, user_id: UserId) -> bool {
        let mut entry = self.members.entry(channel.to_string()).or_default();
        let count = entry.entry(user_id).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Count a user off a channel. Returns true when this removed their
    /// membership (their last connection there).
    pub fn leave(&self, channel: &str, user_id: UserId) -> bool {
        let last = {
            let Some(mut entry) = self.members.get_mut(channel) else {
                return false;
            };
            let Some(count) = entry.get_mut(&user_id) else {
                return false;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                entry.remove(&user_id);
                true
            } else {
                false
            }
        };
        self.members.remove_if(channel, |_, users| users.is_empty());
        last
    }

    /// Current members of a channel.
    pub fn snapshot(&self, channel: &str) -> Vec<UserId> {
        self.members
            .get(channel)
            .map(|entry| entry.value().keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of members on a channel.
    pub fn member_count(&self, channel: &str) -> usize {
        self.members
            .get(channel)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    /// Number of channels with at least one member.
    pub fn channel_count(&self) -> usize {
        self.members.len()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
