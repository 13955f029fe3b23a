//! Server error types.

use crate::validation::SchemaError;
use thiserror::Error;

/// Errors raised by the broker's infrastructure.
///
/// Business outcomes (duplicate session id, name collision, ...) are never
/// errors; they are enumerated statuses carried in normal responses. This
/// type covers the transport and plumbing failures around them.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("handshake rejected: {0}")]
    Handshake(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("internal error: {0}")]
    Internal(String),
}
