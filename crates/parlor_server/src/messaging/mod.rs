//! Inbound protocol dispatch and outbound fan-out.

pub mod service;

pub use service::MessageService;

use crate::connection::PlayerId;
use crate::error::ServerError;
use async_trait::async_trait;
use parlor_protocol::ServerMessage;

/// Outbound delivery seam between the dispatcher and the transport.
///
/// [`ConnectionManager`](crate::connection::ConnectionManager) implements
/// this over live WebSocket sinks; tests substitute a recording sink. Sends
/// are best-effort: a failed delivery is the caller's to log, never to
/// retry.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_to_player(&self, id: PlayerId, message: &ServerMessage) -> Result<(), ServerError>;
}
