//! Logging system setup.

use crate::config::{Args, LoggingSettings};
use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from `--debug` or
/// the `[logging]` config section; the JSON layer is toggled by the config.
///
/// # Environment Variables
/// * `RUST_LOG` - overrides the configured filter (e.g. "debug",
///   "parlor_server=trace")
pub fn setup_logging(args: &Args, settings: Option<&LoggingSettings>) -> Result<()> {
    let level = if args.debug {
        "debug"
    } else {
        settings.map(|s| s.level.as_str()).unwrap_or("info")
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json_format = settings.is_some_and(|s| s.json_format);
    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()?;
    }

    Ok(())
}
