use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::error::{CastingError, Result};

/// Install the global `tracing` subscriber for a host process.
///
/// `RUST_LOG` takes precedence over the configured level. The format is
/// `pretty` or `json`; anything else falls back to the compact default.
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| CastingError::Logging(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let installed = match settings.format.as_str() {
        "pretty" => subscriber.pretty().try_init(),
        "json" => subscriber.json().try_init(),
        _ => subscriber.try_init(),
    };

    installed.map_err(|e| CastingError::Logging(e.to_string()))
}
