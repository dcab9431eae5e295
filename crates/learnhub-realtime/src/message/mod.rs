//! WebSocket wire message types.

pub mod types;

pub use types::{InboundMessage, OutboundMessage};
