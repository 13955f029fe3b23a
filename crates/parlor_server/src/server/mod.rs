//! The connection gateway: TCP accept loop, WebSocket handshake, and
//! per-connection frame routing.

pub mod config;
pub mod core;
pub mod handler;
pub mod handshake;

pub use config::ServerConfig;
pub use core::GameServer;
