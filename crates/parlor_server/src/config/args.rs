//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the parlor session broker.
///
/// Arguments override the corresponding values from the configuration
/// file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    ///
    /// If the file doesn't exist, a default configuration will be created.
    #[arg(short, long, default_value = "parlor.toml")]
    pub config: PathBuf,

    /// Listen address override, format "IP:PORT"
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Network secret override
    #[arg(short, long)]
    pub secret: Option<String>,

    /// Schema directory override
    #[arg(long)]
    pub schemas: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("parlor.toml"),
            listen: None,
            secret: None,
            schemas: None,
            debug: false,
        }
    }
}
