//! Channel registry: all channels and their subscriptions.

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

use super::channel::Channel;
use super::subscription::SubscriptionTracker;

/// Registry of all active pub/sub channels. Channels are created on first
/// subscribe and dropped when their last subscriber leaves.
#[derive(Debug)]
pub struct ChannelRegistry {
    /// Channel name → channel.
    channels: DashMap<String, Channel>,
    /// Reverse index for connection cleanup.
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// Create a new channel registry.
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            subscriptions: SubscriptionTracker::new(),
        }
    }

    /// Subscribe a connection to a channel. Returns false when the
    /// connection already held it.
    pub fn subscribe(&self, channel_name: String, conn_id: ConnectionId) -> bool {
        let newly_added = self
            .channels
            .entry(channel_name.clone())
            .or_insert_with(|| Channel::new(channel_name.clone()))
            .subscribe(conn_id);

        if newly_added {
            self.subscriptions.add(conn_id, channel_name);
        }
        newly_added
    }

    /// Unsubscribe a connection from a channel. Returns false when the
    /// connection did not hold it.
    pub fn unsubscribe(&self, channel_name: &str, conn_id: ConnectionId) -> bool {
        let removed = self
            .channels
            .get_mut(channel_name)
            .map(|mut channel| channel.unsubscribe(conn_id))
            .unwrap_or(false);

        self.channels.remove_if(channel_name, |_, ch| ch.is_empty());
        self.subscriptions.remove(conn_id, channel_name);
        removed
    }

    /// Unsubscribe a connection from every channel it holds. Returns the
    /// channel names it held.
    pub fn unsubscribe_all(&self, conn_id: ConnectionId) -> Vec<String> {
        let channels = self.subscriptions.remove_all(conn_id);
        for channel_name in &channels {
            if let Some(mut channel) = self.channels.get_mut(channel_name) {
                channel.unsubscribe(conn_id);
            }
            self.channels.remove_if(channel_name, |_, ch| ch.is_empty());
        }
        channels.into_iter().collect()
    }

    /// All subscriber connection IDs for a channel.
    pub fn get_subscribers(&self, channel_name: &str) -> Vec<ConnectionId> {
        self.channels
            .get(channel_name)
            .map(|ch| ch.get_subscribers())
            .unwrap_or_default()
    }

    /// Whether a connection holds a channel.
    pub fn is_subscribed(&self, conn_id: ConnectionId, channel_name: &str) -> bool {
        self.subscriptions.contains(conn_id, channel_name)
    }

    /// Number of subscriptions a connection holds.
    pub fn subscription_count(&self, conn_id: ConnectionId) -> usize {
        self.subscriptions.count(conn_id)
    }

    /// Subscriber count for a channel.
    pub fn channel_subscriber_count(&self, channel_name: &str) -> usize {
        self.channels
            .get(channel_name)
            .map(|ch| ch.subscriber_count())
            .unwrap_or(0)
    }

    /// Total number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
