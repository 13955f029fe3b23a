//! # parlor server — session broker for board-game clients
//!
//! A WebSocket session broker that lets named participants rendezvous
//! around shared game instances, exchange schema-validated JSON payloads,
//! and be notified of each other's presence and absence.
//!
//! The broker contains **no game logic**: payloads are opaque. It provides:
//!
//! * **Connection gateway** — WebSocket upgrade guarded by a shared-secret
//!   and player-name handshake, one task per connection
//! * **Session coordination** — create/join/leave with a strict
//!   one-game-per-player state machine and orphaned-session reclamation
//! * **Payload validation** — per-game-type JSON Schema sets
//!   (init/action/end), compiled lazily and flushed on admin mutation
//! * **Message dispatch** — status responses to the sender, broadcasts to
//!   the other members of the game
//!
//! ## Message Flow
//!
//! 1. Client connects with `NetworkSecret` and `PlayerName` headers
//! 2. Text frames carry `{"type": ..., "data": ...}` envelopes
//!    ([`parlor_protocol`])
//! 3. Requests mutate session state via the coordinator; game payloads are
//!    validated against the game type's schema for the matching phase
//! 4. The sender always gets a status response first; success fans the
//!    message out to the other members
//! 5. Disconnect acts as a leave and notifies the remaining members
//!
//! ## Concurrency
//!
//! Frames of one connection are handled sequentially; connections run
//! concurrently and serialize only on the session coordinator's single
//! coarse lock. A background task reaps games left empty past the
//! configured timeout.

pub use config::{Args, Config};
pub use error::ServerError;
pub use server::{GameServer, ServerConfig};

pub mod config;
pub mod connection;
pub mod error;
pub mod game;
pub mod logging;
pub mod messaging;
pub mod server;
pub mod shutdown;
pub mod validation;
