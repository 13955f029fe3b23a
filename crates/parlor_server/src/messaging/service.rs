//! Decodes inbound envelopes, drives the session coordinator and schema
//! validation, and fans broadcasts out to the other members of a game.

use crate::connection::{Player, PlayerId};
use crate::error::ServerError;
use crate::game::GameService;
use crate::messaging::MessageSink;
use crate::validation::JsonSchemaValidator;
use parlor_protocol::{
    ClientRequest, CreateGameStatus, GameMessageStatus, GamePhase, JoinGameStatus,
    LeaveGameStatus, ServerMessage,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Handles every text frame received by the gateway.
///
/// Each request variant has one handler. Handlers always reply to the
/// sender first and only then broadcast to the other members of the game;
/// broadcasts exclude the sender and are a no-op when the game has no other
/// members.
pub struct MessageService {
    games: Arc<GameService>,
    validator: Arc<JsonSchemaValidator>,
    sink: Arc<dyn MessageSink>,
}

impl MessageService {
    pub fn new(
        games: Arc<GameService>,
        validator: Arc<JsonSchemaValidator>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            games,
            validator,
            sink,
        }
    }

    /// Decodes and dispatches one inbound frame from `player`.
    ///
    /// An undecodable envelope is an error for the gateway to log; it never
    /// produces a response and must not affect other connections.
    pub async fn handle_message(&self, player: &Player, text: &str) -> Result<(), ServerError> {
        let request: ClientRequest = serde_json::from_str(text)
            .map_err(|e| ServerError::Serialization(format!("undecodable envelope: {e}")))?;

        debug!("Dispatching {:?} from player {}", request, player.name);

        match request {
            ClientRequest::CreateGame {
                game_type,
                session_id,
            } => self.handle_create_game(player, &game_type, &session_id).await,
            ClientRequest::JoinGame {
                session_id,
                greeting,
            } => self.handle_join_game(player, &session_id, greeting).await,
            ClientRequest::LeaveGame { goodbye } => self.handle_leave_game(player, goodbye).await,
            ClientRequest::InitializeGame { payload } => {
                self.handle_game_message(player, GamePhase::Init, payload).await
            }
            ClientRequest::GameAction { payload } => {
                self.handle_game_message(player, GamePhase::Action, payload).await
            }
            ClientRequest::EndGame { payload } => {
                self.handle_game_message(player, GamePhase::End, payload).await
            }
        }
        Ok(())
    }

    /// Treats a closed connection as a leave: removes the player from its
    /// game (if any) and notifies the remaining members. The caller
    /// unregisters the connection afterwards.
    pub async fn handle_disconnect(&self, player: &Player) {
        let game = self.games.current_game(player.id);
        if self.games.leave_game(player.id) != LeaveGameStatus::Success {
            return;
        }
        if let Some(game) = game {
            info!(
                "Player {} disconnected from game {}",
                player.name, game.session_id
            );
            self.broadcast(
                &game.session_id,
                player.id,
                ServerMessage::PlayerLeft {
                    goodbye: "disconnected".to_string(),
                    sender: player.name.clone(),
                },
            )
            .await;
        }
    }

    async fn handle_create_game(&self, player: &Player, game_type: &str, session_id: &str) {
        let status = if !self.validator.exists(game_type) {
            CreateGameStatus::GameTypeDoesNotExist
        } else {
            self.games.create_game(game_type, session_id, player)
        };
        self.reply(player, ServerMessage::CreateGameResponse { status }).await;
    }

    async fn handle_join_game(&self, player: &Player, session_id: &str, greeting: String) {
        let status = self.games.join_game(player, session_id);
        self.reply(player, ServerMessage::JoinGameResponse { status }).await;

        if status == JoinGameStatus::Success {
            self.broadcast(
                session_id,
                player.id,
                ServerMessage::PlayerJoined {
                    greeting,
                    sender: player.name.clone(),
                },
            )
            .await;
        }
    }

    async fn handle_leave_game(&self, player: &Player, goodbye: String) {
        let game = self.games.current_game(player.id);
        let status = self.games.leave_game(player.id);
        self.reply(player, ServerMessage::LeaveGameResponse { status }).await;

        if status == LeaveGameStatus::Success {
            if let Some(game) = game {
                self.broadcast(
                    &game.session_id,
                    player.id,
                    ServerMessage::PlayerLeft {
                        goodbye,
                        sender: player.name.clone(),
                    },
                )
                .await;
            }
        }
    }

    async fn handle_game_message(&self, player: &Player, phase: GamePhase, payload: String) {
        let game = self.games.current_game(player.id);
        let (status, errors) = match &game {
            None => (GameMessageStatus::NoAssociatedGame, Vec::new()),
            Some(game) => match self.validator.validate(&game.game_type, phase, &payload) {
                Ok(errors) if errors.is_empty() => (GameMessageStatus::Success, errors),
                Ok(errors) => (GameMessageStatus::InvalidJson, errors),
                Err(e) => {
                    error!(
                        "Validation unavailable for game type `{}`: {}",
                        game.game_type, e
                    );
                    (GameMessageStatus::ServerError, Vec::new())
                }
            },
        };

        let response = match phase {
            GamePhase::Init => ServerMessage::InitializeGameResponse {
                status,
                errors: errors.clone(),
            },
            GamePhase::Action => ServerMessage::GameActionResponse {
                status,
                errors: errors.clone(),
            },
            GamePhase::End => ServerMessage::EndGameResponse {
                status,
                errors: errors.clone(),
            },
        };
        self.reply(player, response).await;

        if status == GameMessageStatus::Success {
            if let Some(game) = game {
                let sender = player.name.clone();
                let forwarded = match phase {
                    GamePhase::Init => ServerMessage::InitializeGame { payload, sender },
                    GamePhase::Action => ServerMessage::GameAction { payload, sender },
                    GamePhase::End => ServerMessage::EndGame { payload, sender },
                };
                self.broadcast(&game.session_id, player.id, forwarded).await;
            }
        }
    }

    async fn reply(&self, player: &Player, message: ServerMessage) {
        if let Err(e) = self.sink.send_to_player(player.id, &message).await {
            warn!("Failed to reply to player {}: {}", player.name, e);
        }
    }

    /// Sends `message` to every current member of the session except
    /// `exclude`. Delivery is best-effort per member.
    async fn broadcast(&self, session_id: &str, exclude: PlayerId, message: ServerMessage) {
        for member in self.games.members(session_id) {
            if member.id == exclude {
                continue;
            }
            if let Err(e) = self.sink.send_to_player(member.id, &message).await {
                warn!("Failed to deliver broadcast to {}: {}", member.name, e);
            }
        }
    }
}
