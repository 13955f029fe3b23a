//! Wire protocol for the parlor session broker.
//!
//! All traffic is JSON text frames over a persistent WebSocket connection,
//! using an adjacently tagged envelope: `{"type": "...", "data": {...}}`.
//! Clients send [`ClientRequest`] variants; the server answers the sender
//! with a response variant of [`ServerMessage`] and fans notifications and
//! forwarded game payloads out to the other members of a game.
//!
//! Status enumerations are closed sets per message kind and serialize as
//! SCREAMING_SNAKE_CASE strings on the wire.

use serde::{Deserialize, Serialize};

// ============================================================================
// Requests (client -> server)
// ============================================================================

/// A message sent from a client to the server.
///
/// Game payloads (`InitializeGame`/`GameAction`/`EndGame`) are opaque JSON
/// strings; the broker validates them against the game type's schema for the
/// matching phase but never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientRequest {
    /// Open a new game session with a caller-supplied, globally unique id.
    CreateGame {
        game_type: String,
        session_id: String,
    },
    /// Join an existing session by id.
    JoinGame {
        session_id: String,
        greeting: String,
    },
    /// Leave the current session.
    LeaveGame { goodbye: String },
    /// Initial game state payload.
    InitializeGame { payload: String },
    /// In-game move payload.
    GameAction { payload: String },
    /// Game-over payload.
    EndGame { payload: String },
}

// ============================================================================
// Responses and notifications (server -> client)
// ============================================================================

/// A message sent from the server to a client.
///
/// Responses go to the request sender only. `PlayerJoined`, `PlayerLeft` and
/// the forwarded game payload variants are broadcast to the *other* members
/// of the sender's game, with `sender` set to the originating player's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    CreateGameResponse {
        status: CreateGameStatus,
    },
    JoinGameResponse {
        status: JoinGameStatus,
    },
    LeaveGameResponse {
        status: LeaveGameStatus,
    },
    InitializeGameResponse {
        status: GameMessageStatus,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        errors: Vec<String>,
    },
    GameActionResponse {
        status: GameMessageStatus,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        errors: Vec<String>,
    },
    EndGameResponse {
        status: GameMessageStatus,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        errors: Vec<String>,
    },
    /// Another player joined the sender's game.
    PlayerJoined {
        greeting: String,
        sender: String,
    },
    /// Another player left (or disconnected from) the sender's game.
    PlayerLeft {
        goodbye: String,
        sender: String,
    },
    /// Forwarded init payload from another member.
    InitializeGame {
        payload: String,
        sender: String,
    },
    /// Forwarded action payload from another member.
    GameAction {
        payload: String,
        sender: String,
    },
    /// Forwarded end payload from another member.
    EndGame {
        payload: String,
        sender: String,
    },
}

// ============================================================================
// Status enumerations
// ============================================================================

/// Outcome of a `CreateGame` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateGameStatus {
    /// The session was created and the sender is now hosting it.
    Success,
    /// The sender is already in a game and must leave it first.
    AlreadyAssociatedWithGame,
    /// A live session with this id already exists.
    SessionIdAlreadyExists,
    /// No schema set is registered for the requested game type.
    GameTypeDoesNotExist,
}

/// Outcome of a `JoinGame` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinGameStatus {
    Success,
    AlreadyAssociatedWithGame,
    /// No live session with this id.
    InvalidSessionId,
    /// A member of the session already uses the sender's name.
    PlayerNameAlreadyTaken,
}

/// Outcome of a `LeaveGame` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveGameStatus {
    Success,
    NoAssociatedGame,
}

/// Outcome of an `InitializeGame`/`GameAction`/`EndGame` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMessageStatus {
    /// Payload matched the schema and was forwarded to the other members.
    Success,
    /// The sender is not in a game.
    NoAssociatedGame,
    /// Payload violated the schema; violations are attached to the response.
    InvalidJson,
    /// A fault on the server side, e.g. the schema set went missing.
    ServerError,
}

/// The validation phase a game payload belongs to.
///
/// Each game type registers one schema per phase; the broker picks the
/// validator matching the request variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Init,
    Action,
    End,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Init => write!(f, "init"),
            GamePhase::Action => write!(f, "action"),
            GamePhase::End => write!(f, "end"),
        }
    }
}
