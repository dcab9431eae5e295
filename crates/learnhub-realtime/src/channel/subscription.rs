//! Subscription tracking: which connections hold which channels.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

/// Reverse index from connection ID to its channel names. Used to clean
/// up every channel a connection held when it goes away.
#[derive(Debug)]
pub struct SubscriptionTracker {
    conn_to_channels: DashMap<ConnectionId, HashSet<String>>,
}

impl SubscriptionTracker {
    /// Create a new subscription tracker.
    pub fn new() -> Self {
        Self {
            conn_to_channels: DashMap::new(),
        }
    }

    /// Record a subscription.
    pub fn add(&self, conn_id: ConnectionId, channel: String) {
        self.conn_to_channels
            .entry(conn_id)
            .or_default()
            .insert(channel);
    }

    /// Remove a subscription.
    pub fn remove(&self, conn_id: ConnectionId, channel: &str) {
        if let Some(mut channels) = self.conn_to_channels.get_mut(&conn_id) {
            channels.remove(channel);
        }
    }

    /// Whether a connection holds a channel.
    pub fn contains(&self, conn_id: ConnectionId, channel: &str) -> bool {
        self.conn_to_channels
            .get(&conn_id)
            .map(|entry| entry.value().contains(channel))
            .unwrap_or(false)
    }

    /// Number of subscriptions a connection holds.
    pub fn count(&self, conn_id: ConnectionId) -> usize {
        self.conn_to_channels
            .get(&conn_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    /// Remove and return all subscriptions for a connection.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<String> {
        self.conn_to_channels
            .remove(&conn_id)
            .map(|(_, channels)| channels)
            .unwrap_or_default()
    }
}

impl Default for SubscriptionTracker {
    fn default() -> Self {
        Self::new()
    }
}
