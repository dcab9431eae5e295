//! Top-level realtime engine that ties the subsystems together.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use learnhub_core::config::RealtimeConfig;
use learnhub_core::types::UserId;

use crate::broadcast::ChannelPublisher;
use crate::channel::registry::ChannelRegistry;
use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;
use crate::presence::registry::PresenceRegistry;

/// Central realtime engine coordinating connections, channels, and
/// presence. One per process; the WebSocket handler and the service
/// layer share it through `Arc`.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Channel registry.
    pub channels: Arc<ChannelRegistry>,
    /// Presence registry.
    pub presence: Arc<PresenceRegistry>,
    /// Configuration.
    pub config: RealtimeConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Create a new realtime engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let channels = Arc::new(ChannelRegistry::new());
        let presence = Arc::new(PresenceRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            channels.clone(),
            presence.clone(),
        ));

        info!("Realtime engine initialized");

        Self {
            connections,
            channels,
            presence,
            config,
            shutdown_tx,
        }
    }

    /// A shutdown receiver for socket tasks to watch.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Current members and count of a presence channel.
    pub fn presence_members(&self, channel: &str) -> (Vec<UserId>, usize) {
        let members = self.presence.snapshot(channel);
        let count = members.len();
        (members, count)
    }

    /// Shut the engine down, closing every connection.
    pub fn shutdown(&self) {
        info!("Shutting down realtime engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
        info!("Realtime engine shut down");
    }
}

#[async_trait]
impl ChannelPublisher for RealtimeEngine {
    async fn publish(&self, channel: &str, event: &str, data: serde_json::Value) {
        self.connections.broadcast_to_channel(
            channel,
            &OutboundMessage::Event {
                channel: channel.to_string(),
                event: event.to_string(),
                data,
            },
        );
    }
}
