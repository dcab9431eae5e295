//! Connection manager: lifecycle, inbound dispatch, channel fanout.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use learnhub_core::config::RealtimeConfig;
use learnhub_core::types::{ChapterId, UserId};

use crate::broadcast::{PRESENCE_MEMBER_ADDED, PRESENCE_MEMBER_REMOVED, PRESENCE_SUBSCRIPTION_SUCCEEDED, USER_TYPING};
use crate::channel::registry::ChannelRegistry;
use crate::channel::types::ChannelKind;
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::presence::registry::PresenceRegistry;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
///
/// Everything here is fire-and-forget: fanout drops messages for slow
/// or dead connections and never propagates a failure to the caller.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    channels: Arc<ChannelRegistry>,
    presence: Arc<PresenceRegistry>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        channels: Arc<ChannelRegistry>,
        presence: Arc<PresenceRegistry>,
    ) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            channels,
            presence,
            config,
        }
    }

    /// Register a new authenticated connection.
    ///
    /// Returns the handle and the receiver the socket task drains. A user
    /// at the connection limit has their oldest connection evicted first.
    pub fn register(&self, user_id: UserId) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));

        let existing = self.pool.get_user_connections(user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at connection limit, evicting oldest"
            );
            if let Some(oldest) = existing.first() {
                self.unregister(&oldest.id);
            }
        }

        self.pool.add(handle.clone());

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregister a connection: drop its subscriptions and leave every
    /// presence channel it held.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        let Some(handle) = self.pool.remove(conn_id) else {
            return;
        };
        handle.mark_dead();

        let held = self.channels.unsubscribe_all(*conn_id);
        for channel in &held {
            self.leave_presence(channel, handle.user_id);
        }

        info!(
            conn_id = %conn_id,
            user_id = %handle.user_id,
            "WebSocket connection unregistered"
        );
    }

    /// Process one inbound client frame.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        let msg: InboundMessage = match serde_json::from_str(raw) {
            Ok(m) => m,
            Err(e) => {
                handle.send(OutboundMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
                return;
            }
        };

        match msg {
            InboundMessage::Subscribe { channel } => self.handle_subscribe(&handle, &channel),
            InboundMessage::Unsubscribe { channel } => self.handle_unsubscribe(&handle, &channel),
            InboundMessage::Typing { chapter_id } => self.handle_typing(&handle, chapter_id),
            InboundMessage::Pong { .. } => handle.record_pong().await,
        }
    }

    /// Subscribe a connection, joining presence when the channel carries it.
    fn handle_subscribe(&self, handle: &Arc<ConnectionHandle>, channel: &str) {
        let Some(kind) = ChannelKind::parse(channel) else {
            handle.send(OutboundMessage::Error {
                code: "INVALID_CHANNEL".to_string(),
                message: format!("Unknown channel: {channel}"),
            });
            return;
        };

        if !self.channels.is_subscribed(handle.id, channel)
            && self.channels.subscription_count(handle.id)
                >= self.config.max_subscriptions_per_connection
        {
            handle.send(OutboundMessage::Error {
                code: "MAX_SUBSCRIPTIONS".to_string(),
                message: format!(
                    "Subscription limit ({}) reached",
                    self.config.max_subscriptions_per_connection
                ),
            });
            return;
        }

        let newly_added = self.channels.subscribe(channel.to_string(), handle.id);
        handle.send(OutboundMessage::Subscribed {
            channel: channel.to_string(),
        });

        if kind.is_presence() && newly_added {
            let first_for_user = self.presence.join(channel, handle.user_id);
            let members = self.presence.snapshot(channel);
            handle.send(OutboundMessage::Event {
                channel: channel.to_string(),
                event: PRESENCE_SUBSCRIPTION_SUCCEEDED.to_string(),
                data: serde_json::json!({
                    "members": members,
                    "count": members.len(),
                }),
            });
            if first_for_user {
                self.broadcast_to_channel_except(
                    channel,
                    handle.id,
                    &OutboundMessage::Event {
                        channel: channel.to_string(),
                        event: PRESENCE_MEMBER_ADDED.to_string(),
                        data: serde_json::json!({ "user_id": handle.user_id }),
                    },
                );
            }
        }

        debug!(conn_id = %handle.id, channel = %channel, "Subscribed to channel");
    }

    /// Unsubscribe a connection, leaving presence when it held the channel.
    fn handle_unsubscribe(&self, handle: &Arc<ConnectionHandle>, channel: &str) {
        if self.channels.unsubscribe(channel, handle.id) {
            self.leave_presence(channel, handle.user_id);
            debug!(conn_id = %handle.id, channel = %channel, "Unsubscribed from channel");
        }
    }

    /// Relay a typing indicator to everyone else on the chapter's typing
    /// channel. The sender's own connection never hears its echo.
    fn handle_typing(&self, handle: &Arc<ConnectionHandle>, chapter_id: ChapterId) {
        let channel = ChannelKind::ChapterTyping(chapter_id).name();
        if !self.channels.is_subscribed(handle.id, &channel) {
            debug!(conn_id = %handle.id, "Typing on a channel the connection does not hold");
            return;
        }
        self.broadcast_to_channel_except(
            &channel,
            handle.id,
            &OutboundMessage::Event {
                channel: channel.clone(),
                event: USER_TYPING.to_string(),
                data: serde_json::json!({
                    "user_id": handle.user_id,
                    "chapter_id": chapter_id,
                }),
            },
        );
    }

    /// Drop one presence count for the user; on their last one, tell the
    /// channel's remaining subscribers.
    fn leave_presence(&self, channel: &str, user_id: UserId) {
        let carries_presence = ChannelKind::parse(channel)
            .map(|kind| kind.is_presence())
            .unwrap_or(false);
        if carries_presence && self.presence.leave(channel, user_id) {
            self.broadcast_to_channel(
                channel,
                &OutboundMessage::Event {
                    channel: channel.to_string(),
                    event: PRESENCE_MEMBER_REMOVED.to_string(),
                    data: serde_json::json!({ "user_id": user_id }),
                },
            );
        }
    }

    /// Push a message to every subscriber of a channel.
    pub fn broadcast_to_channel(&self, channel: &str, message: &OutboundMessage) {
        for conn_id in self.channels.get_subscribers(channel) {
            if let Some(handle) = self.pool.get(&conn_id) {
                handle.send(message.clone());
            }
        }
    }

    /// Push a message to every subscriber of a channel except one
    /// connection.
    pub fn broadcast_to_channel_except(
        &self,
        channel: &str,
        except: ConnectionId,
        message: &OutboundMessage,
    ) {
        for conn_id in self.channels.get_subscribers(channel) {
            if conn_id == except {
                continue;
            }
            if let Some(handle) = self.pool.get(&conn_id) {
                handle.send(message.clone());
            }
        }
    }

    /// Close every connection. Used during shutdown; no presence events
    /// are emitted since nobody is left to hear them.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_dead();
            self.pool.remove(&conn.id);
            self.channels.unsubscribe_all(conn.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// The connection pool.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}
