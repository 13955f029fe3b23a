//! Lifecycle of one accepted connection.

use crate::connection::{ConnectionManager, Player};
use crate::error::ServerError;
use crate::messaging::MessageService;
use crate::server::handshake;
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Drives one connection from WebSocket upgrade to disconnect.
///
/// Frames from this connection are handled one at a time, in arrival
/// order; concurrency exists only across connections. Whatever ends the
/// read loop — clean close or transport error — the player is removed from
/// its game (notifying the remaining members) and unregistered.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    connections: Arc<ConnectionManager>,
    messages: Arc<MessageService>,
    secret: String,
) -> Result<(), ServerError> {
    let mut player_name = None;
    let ws_stream = accept_hdr_async(stream, |request: &Request, response: Response| {
        match handshake::check_handshake(request, &secret) {
            Ok(name) => {
                player_name = Some(name);
                Ok(response)
            }
            Err(rejection) => Err(rejection),
        }
    })
    .await
    .map_err(|e| ServerError::Handshake(format!("{addr}: {e}")))?;

    let name = player_name
        .ok_or_else(|| ServerError::Internal("handshake accepted without player name".to_string()))?;

    let (sink, mut receiver) = ws_stream.split();
    let player = Player::new(name, addr);
    connections.register(player.clone(), sink);
    info!("Player {} ({}) connected from {}", player.name, player.id, addr);
    debug!("Connected players: {:?}", connections.roster());

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(e) = messages.handle_message(&player, text.as_str()).await {
                    error!("Error handling frame from {}: {}", player.name, e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Player {} requested close", player.name);
                break;
            }
            Ok(Message::Ping(payload)) => {
                connections.send_pong(player.id, payload).await;
            }
            Ok(Message::Pong(_)) => {}
            Ok(_) => {
                warn!("Ignoring non-text frame from {}", player.name);
            }
            Err(e) => {
                error!("Transport error for player {}: {}", player.name, e);
                break;
            }
        }
    }

    // Disconnection is a normal leave: notify the game, then forget the
    // connection.
    messages.handle_disconnect(&player).await;
    connections.unregister(player.id);
    info!("Player {} disconnected", player.name);
    debug!("Connected players: {:?}", connections.roster());
    Ok(())
}
