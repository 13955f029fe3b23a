//! Payload validation: the schema store and the cached per-game-type
//! validator sets.

pub mod store;
pub mod validator;

pub use store::{GameSchemas, SchemaStore};
pub use validator::{JsonSchemaValidator, EXAMPLE_GAME_TYPE};

use parlor_protocol::GamePhase;
use thiserror::Error;

/// Faults crossing the validator boundary.
///
/// `NotFound` is raised only when the store has no entry for the game type;
/// a payload that merely violates its schema is not an error but a list of
/// violation strings. The dispatcher converts any `SchemaError` into a
/// `SERVER_ERROR` response status.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("no schema set registered for game type `{game_type}`")]
    NotFound { game_type: String },

    #[error("invalid {phase} schema for game type `{game_type}`: {message}")]
    InvalidSchema {
        game_type: String,
        phase: GamePhase,
        message: String,
    },
}
