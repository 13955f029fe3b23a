//! Connection lifecycle: player identity and the live-connection registry.

pub mod manager;

pub use manager::ConnectionManager;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::SystemTime;
use uuid::Uuid;

/// Unique identifier for a connected player.
///
/// This is the opaque handle the rest of the broker uses to address a
/// connection; the player's name is only unique within a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One connected, named participant.
///
/// Created by the gateway once the handshake has been accepted; destroyed on
/// disconnect. Which game (if any) the player currently belongs to is
/// tracked by the session coordinator, not here.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub remote_addr: SocketAddr,
    pub connected_at: SystemTime,
}

impl Player {
    pub fn new(name: impl Into<String>, remote_addr: SocketAddr) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            remote_addr,
            connected_at: SystemTime::now(),
        }
    }
}
