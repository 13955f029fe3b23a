//! Registry of live connections and their outbound sinks.

use crate::connection::{Player, PlayerId};
use crate::error::ServerError;
use crate::messaging::MessageSink;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream::SplitSink;
use futures::SinkExt;
use parlor_protocol::ServerMessage;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};
use tracing::warn;

/// Type alias for the WebSocket sink half of a connection.
pub type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Tracks every live connection: the player identity and the sink used to
/// send frames back.
///
/// Registration and removal happen once per connection from its gateway
/// task; sends may come from any task (broadcasts fan out from whichever
/// connection dispatched the triggering message) and are best-effort.
pub struct ConnectionManager {
    players: DashMap<PlayerId, Player>,
    sinks: DashMap<PlayerId, WsSink>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
            sinks: DashMap::new(),
        }
    }

    /// Registers a freshly connected player together with its outbound sink.
    pub fn register(&self, player: Player, sink: WsSink) {
        self.sinks.insert(player.id, sink);
        self.players.insert(player.id, player);
    }

    /// Removes a player and drops its sink, returning the identity if it was
    /// registered.
    pub fn unregister(&self, id: PlayerId) -> Option<Player> {
        self.sinks.remove(&id);
        self.players.remove(&id).map(|(_, player)| player)
    }

    /// Snapshot of every connected player.
    pub fn all(&self) -> Vec<Player> {
        self.players.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Names of every connected player, for roster logging.
    pub fn roster(&self) -> Vec<String> {
        self.players.iter().map(|entry| entry.value().name.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.players.len()
    }

    /// Sends a raw text frame to one connection.
    pub async fn send_text(&self, id: PlayerId, text: String) -> Result<(), ServerError> {
        if let Some(mut sink) = self.sinks.get_mut(&id) {
            sink.send(Message::text(text))
                .await
                .map_err(|e| ServerError::Network(format!("failed to send frame: {e}")))?;
        }
        Ok(())
    }

    /// Answers a transport-level ping.
    pub async fn send_pong(&self, id: PlayerId, payload: tokio_tungstenite::tungstenite::Bytes) {
        if let Some(mut sink) = self.sinks.get_mut(&id) {
            let _ = sink.send(Message::Pong(payload)).await;
        }
    }

    /// Sends a close frame to every connection and clears the registry.
    pub async fn shutdown_all(&self) {
        for mut entry in self.sinks.iter_mut() {
            let _ = entry.value_mut().send(Message::Close(None)).await;
        }
        self.sinks.clear();
        self.players.clear();
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSink for ConnectionManager {
    async fn send_to_player(&self, id: PlayerId, message: &ServerMessage) -> Result<(), ServerError> {
        let text = serde_json::to_string(message)
            .map_err(|e| ServerError::Serialization(e.to_string()))?;
        if let Err(e) = self.send_text(id, text).await {
            warn!("Dropping message for player {}: {}", id, e);
            return Err(e);
        }
        Ok(())
    }
}
