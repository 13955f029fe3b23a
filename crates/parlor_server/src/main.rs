//! parlor session broker - main entry point.

use anyhow::Result;
use clap::Parser;
use parlor_server::{config, logging, shutdown};
use parlor_server::{Args, Config, GameServer, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: the logging format itself is configured there.
    let config = config::load_config(&args).await?;
    logging::setup_logging(&args, config.logging.as_ref())?;

    info!("Starting parlor session broker");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", args.config.display());

    let server_config = create_server_config(&config, &args)?;
    log_server_configuration(&server_config);

    let server = Arc::new(GameServer::new(server_config));
    let shutdown_receiver = shutdown::setup_shutdown_handler().await;

    tokio::select! {
        result = server.start() => {
            match result {
                Ok(_) => info!("Server stopped normally"),
                Err(e) => {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = shutdown_receiver => {
            info!("Shutdown signal received");
            server.shutdown().await;
        }
    }

    Ok(())
}

/// Builds the runtime server configuration from the config file and CLI
/// overrides.
fn create_server_config(config: &Config, args: &Args) -> Result<ServerConfig> {
    let listen_addr = args
        .listen
        .as_deref()
        .unwrap_or(&config.server.listen_addr)
        .parse()
        .map_err(|e| anyhow::anyhow!("failed to parse listen address: {e}"))?;

    let network_secret = args
        .secret
        .clone()
        .unwrap_or_else(|| config.server.network_secret.clone());

    let schema_directory = args.schemas.clone().or_else(|| {
        config
            .schemas
            .as_ref()
            .and_then(|s| s.directory.as_ref())
            .map(Into::into)
    });

    Ok(ServerConfig {
        listen_addr,
        network_secret,
        orphan_sweep_interval: Duration::from_millis(config.games.orphan_sweep_interval_ms),
        orphan_timeout: Duration::from_millis(config.games.orphan_timeout_ms),
        schema_directory,
    })
}

fn log_server_configuration(config: &ServerConfig) {
    info!("Server configuration:");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Orphan sweep interval: {:?}", config.orphan_sweep_interval);
    info!("  Orphan timeout: {:?}", config.orphan_timeout);
    match &config.schema_directory {
        Some(dir) => info!("  Schema directory: {}", dir.display()),
        None => info!("  Schema directory: (none, bundled schemas only)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_server_config_from_defaults() {
        let config = Config::default();
        let args = Args::default();

        let server_config = create_server_config(&config, &args).unwrap();
        assert_eq!(server_config.listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(server_config.orphan_sweep_interval, Duration::from_secs(20));
        assert_eq!(server_config.orphan_timeout, Duration::from_secs(300));
        assert!(server_config.schema_directory.is_none());
    }

    #[test]
    fn cli_arguments_override_the_config_file() {
        let config = Config::default();
        let args = Args {
            listen: Some("0.0.0.0:9090".to_string()),
            secret: Some("override".to_string()),
            ..Default::default()
        };

        let server_config = create_server_config(&config, &args).unwrap();
        assert_eq!(server_config.listen_addr.to_string(), "0.0.0.0:9090");
        assert_eq!(server_config.network_secret, "override");
    }

    #[test]
    fn bad_listen_address_is_an_error() {
        let config = Config::default();
        let args = Args {
            listen: Some("not-an-address".to_string()),
            ..Default::default()
        };

        assert!(create_server_config(&config, &args).is_err());
    }
}
