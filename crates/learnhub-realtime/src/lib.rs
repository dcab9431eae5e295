//! # learnhub-realtime
//!
//! In-process WebSocket engine for LearnHub: pub/sub channels keyed by
//! name, chapter and global presence with per-user reference counting,
//! and a fire-and-forget publisher seam the service layer broadcasts
//! through. All state is in memory; a restart clears it and clients
//! rebuild their subscriptions on reconnect.

pub mod broadcast;
pub mod channel;
pub mod connection;
pub mod engine;
pub mod message;
pub mod presence;

pub use broadcast::{ChannelPublisher, EventPublisher};
pub use engine::RealtimeEngine;
