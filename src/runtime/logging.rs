use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

const LOG_ENV: &str = "ENCORE_LOG";

/// Install the global `tracing` subscriber.
///
/// The terminal belongs to the UI, so events go to `[logging] file` or
/// nowhere. `ENCORE_LOG` takes precedence over the configured level.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = settings.file.as_ref() else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    Ok(())
}
