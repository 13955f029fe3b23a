//! Runtime configuration for the broker.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Parameters the running server is built from.
///
/// Assembled in the binary from the TOML config file and CLI overrides;
/// tests construct it directly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the TCP listener binds to.
    pub listen_addr: SocketAddr,

    /// Shared secret a client must present in the `NetworkSecret` handshake
    /// header before the WebSocket upgrade is accepted.
    pub network_secret: String,

    /// How often the orphan reaper scans the game registry.
    pub orphan_sweep_interval: Duration,

    /// How long a game may sit without members before it is reaped.
    pub orphan_timeout: Duration,

    /// Optional directory scanned at startup for
    /// `<game_type>.{init,action,end}.json` schema triples.
    pub schema_directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().expect("valid default address"),
            network_secret: "change-me".to_string(),
            orphan_sweep_interval: Duration::from_secs(20),
            orphan_timeout: Duration::from_secs(300),
            schema_directory: None,
        }
    }
}
