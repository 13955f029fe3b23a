//! Configuration: command-line arguments and the TOML config file.

pub mod args;
pub mod settings;

pub use args::Args;
pub use settings::{Config, GameSettings, LoggingSettings, SchemaSettings, ServerSettings};

use anyhow::{Context, Result};

/// Loads configuration from the file named in `args`, creating a default
/// config file first if none exists.
///
/// Deliberately does not log: it runs before the tracing subscriber is
/// initialized (the subscriber's format comes from this very file).
pub async fn load_config(args: &Args) -> Result<Config> {
    if args.config.exists() {
        let config_str = tokio::fs::read_to_string(&args.config)
            .await
            .with_context(|| format!("failed to read {}", args.config.display()))?;
        toml::de::from_str::<Config>(&config_str)
            .with_context(|| format!("failed to parse {}", args.config.display()))
    } else {
        let default_config = Config::default();
        let config_str = toml::to_string_pretty(&default_config)?;
        tokio::fs::write(&args.config, config_str)
            .await
            .with_context(|| format!("failed to create {}", args.config.display()))?;
        Ok(default_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn missing_file_yields_defaults_and_creates_the_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        let args = Args {
            config: path.clone(),
            ..Default::default()
        };

        // Delete the file to exercise default creation.
        drop(temp_file);

        let config = load_config(&args).await.unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8080");
        assert!(path.exists());
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn existing_file_is_parsed() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[server]
listen_addr = "0.0.0.0:9090"
network_secret = "s3cret"

[games]
orphan_sweep_interval_ms = 5000
orphan_timeout_ms = 60000
        "#;
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let args = Args {
            config: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        let config = load_config(&args).await.unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:9090");
        assert_eq!(config.games.orphan_timeout_ms, 60000);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"this is not toml [").unwrap();

        let args = Args {
            config: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(load_config(&args).await.is_err());
    }
}
