//! Single channel with subscriber tracking.

use std::collections::HashSet;

use crate::connection::handle::ConnectionId;

/// A single pub/sub channel with a set of subscribers.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Channel name.
    pub name: String,
    /// Set of subscribed connection IDs.
    pub subscribers: HashSet<ConnectionId>,
}

impl Channel {
    /// Create a new empty channel.
    pub fn new(name: String) -> Self {
        Self {
            name,
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber. Returns false when already subscribed.
    pub fn subscribe(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.insert(conn_id)
    }

    /// Remove a subscriber. Returns false when it was not subscribed.
    pub fn unsubscribe(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.remove(&conn_id)
    }

    /// Subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether the channel has no subscribers left.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// All subscriber connection IDs.
    pub fn get_subscribers(&self) -> Vec<ConnectionId> {
        self.subscribers.iter().copied().collect()
    }
}
