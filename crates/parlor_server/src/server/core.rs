//! Core broker server: wires the components together, accepts
//! connections, and runs the orphan reaper.

use crate::connection::ConnectionManager;
use crate::error::ServerError;
use crate::game::GameService;
use crate::messaging::{MessageSink, MessageService};
use crate::server::handler::handle_connection;
use crate::server::ServerConfig;
use crate::validation::{JsonSchemaValidator, SchemaStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::interval;
use tracing::{debug, error, info};

/// The session broker.
///
/// Owns the connection registry, the session coordinator, and the schema
/// validator; `start` runs the accept loop until `shutdown` is called.
/// Contains no game logic: payloads are validated and forwarded, never
/// interpreted.
pub struct GameServer {
    config: ServerConfig,
    connections: Arc<ConnectionManager>,
    games: Arc<GameService>,
    validator: Arc<JsonSchemaValidator>,
    messages: Arc<MessageService>,
    shutdown_sender: broadcast::Sender<()>,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Self {
        let connections = Arc::new(ConnectionManager::new());
        let store = Arc::new(SchemaStore::new());
        let validator = Arc::new(JsonSchemaValidator::new(store));
        let games = Arc::new(GameService::new(config.orphan_timeout));
        let messages = Arc::new(MessageService::new(
            games.clone(),
            validator.clone(),
            connections.clone() as Arc<dyn MessageSink>,
        ));
        let (shutdown_sender, _) = broadcast::channel(1);

        Self {
            config,
            connections,
            games,
            validator,
            messages,
            shutdown_sender,
        }
    }

    /// Starts the broker and runs until shutdown.
    ///
    /// Seeds the bundled example schemas, loads any configured schema
    /// directory, spawns the orphan reaper, then accepts connections —
    /// one spawned task per connection.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.validator.seed_example_schemas();
        if let Some(dir) = &self.config.schema_directory {
            let loaded = self.validator.load_directory(dir)?;
            info!("Loaded {} schema set(s) from {}", loaded, dir.display());
        }

        self.start_orphan_reaper();

        let listener = TcpListener::bind(self.config.listen_addr).await.map_err(|e| {
            ServerError::Network(format!("failed to bind {}: {e}", self.config.listen_addr))
        })?;
        info!("Session broker listening on {}", self.config.listen_addr);

        let mut shutdown_receiver = self.shutdown_sender.subscribe();
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("New connection from {}", addr);
                            let connections = self.connections.clone();
                            let messages = self.messages.clone();
                            let secret = self.config.network_secret.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, addr, connections, messages, secret).await {
                                    // Handshake rejections end up here; they are
                                    // expected and must not disturb anyone else.
                                    info!("Connection from {} ended: {}", addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown_receiver.recv() => {
                    info!("Shutdown signal received, stopping accept loop");
                    break;
                }
            }
        }

        self.connections.shutdown_all().await;
        info!("Server stopped");
        Ok(())
    }

    /// Spawns the background task that periodically reaps games that have
    /// sat empty past the orphan timeout.
    fn start_orphan_reaper(&self) {
        let games = self.games.clone();
        let period = self.config.orphan_sweep_interval;
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let removed = games.remove_orphaned_games();
                if removed > 0 {
                    debug!("Orphan sweep removed {} game(s)", removed);
                }
            }
        });
    }

    /// Signals the accept loop to stop.
    pub async fn shutdown(&self) {
        info!("Shutting down session broker...");
        let _ = self.shutdown_sender.send(());
    }

    /// The session coordinator, for embedding and tests.
    pub fn games(&self) -> Arc<GameService> {
        self.games.clone()
    }

    /// The schema validator, which is also the admin surface for schema
    /// uploads and deletions.
    pub fn validator(&self) -> Arc<JsonSchemaValidator> {
        self.validator.clone()
    }

    /// The connection registry.
    pub fn connections(&self) -> Arc<ConnectionManager> {
        self.connections.clone()
    }
}
