//! Configuration file structures.

use serde::{Deserialize, Serialize};

/// Root configuration object, serialized to/from TOML.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Network and credential settings
    pub server: ServerSettings,
    /// Session lifecycle settings
    pub games: GameSettings,
    /// Optional schema loading settings
    pub schemas: Option<SchemaSettings>,
    /// Optional logging configuration
    pub logging: Option<LoggingSettings>,
}

/// Network and credential settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerSettings {
    /// Address to bind, format "IP:PORT"
    pub listen_addr: String,

    /// Shared secret clients must present during the handshake
    pub network_secret: String,
}

/// Session lifecycle settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameSettings {
    /// How often the orphan reaper scans the registry, in milliseconds
    pub orphan_sweep_interval_ms: u64,

    /// How long a game may sit without members before removal, in
    /// milliseconds
    pub orphan_timeout_ms: u64,
}

/// Schema loading settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SchemaSettings {
    /// Directory scanned at startup for `<game_type>.{init,action,end}.json`
    /// schema triples
    pub directory: Option<String>,
}

/// Logging configuration.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggingSettings {
    /// Logging level filter: "trace", "debug", "info", "warn" or "error"
    pub level: String,

    /// Emit structured JSON log output
    pub json_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                listen_addr: "127.0.0.1:8080".to_string(),
                network_secret: "change-me".to_string(),
            },
            games: GameSettings {
                orphan_sweep_interval_ms: 20_000,
                orphan_timeout_ms: 300_000,
            },
            schemas: None,
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = Config::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.games.orphan_sweep_interval_ms, 20_000);
        assert_eq!(config.games.orphan_timeout_ms, 300_000);
        assert!(config.schemas.is_none());
        assert!(config.logging.is_some());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.server.listen_addr, deserialized.server.listen_addr);
        assert_eq!(config.server.network_secret, deserialized.server.network_secret);
        assert_eq!(
            config.games.orphan_timeout_ms,
            deserialized.games.orphan_timeout_ms
        );
    }

    #[test]
    fn toml_parsing() {
        let toml_str = r#"
[server]
listen_addr = "0.0.0.0:9090"
network_secret = "s3cret"

[games]
orphan_sweep_interval_ms = 5000
orphan_timeout_ms = 60000

[schemas]
directory = "schemas"

[logging]
level = "debug"
json_format = true
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:9090");
        assert_eq!(config.server.network_secret, "s3cret");
        assert_eq!(config.games.orphan_sweep_interval_ms, 5000);
        assert_eq!(
            config.schemas.unwrap().directory.as_deref(),
            Some("schemas")
        );
        assert!(config.logging.unwrap().json_format);
    }
}
