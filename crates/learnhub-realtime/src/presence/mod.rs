//! Ephemeral presence membership per channel.

pub mod registry;

pub use registry::PresenceRegistry;
