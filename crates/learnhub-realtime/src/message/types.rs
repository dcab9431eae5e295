//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use learnhub_core::types::ChapterId;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// The user is typing in a chapter's comment box.
    Typing {
        /// Chapter being typed in.
        chapter_id: ChapterId,
    },
    /// Pong response to a server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Subscription confirmed.
    Subscribed {
        /// Channel name.
        channel: String,
    },
    /// A channel event. `event` names the domain event
    /// (`comment:new`, `user:typing`, `presence:member_added`, ...),
    /// `data` carries its payload.
    Event {
        /// Channel the event was published on.
        channel: String,
        /// Event name.
        event: String,
        /// Event payload.
        data: serde_json::Value,
    },
    /// Ping (server keepalive).
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}
