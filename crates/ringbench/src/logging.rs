#![forbid(unsafe_code)]

//! Global tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};
use crate::error::{Result, RingbenchError};

/// Environment variable that overrides `log.level`.
pub const LOG_ENV: &str = "RINGBENCH_LOG";

/// Filter from [`LOG_ENV`] if set, otherwise from the configured level.
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => {
            EnvFilter::try_new(directives).map_err(|err| RingbenchError::logging(err.to_string()))
        }
        _ => EnvFilter::try_new(&config.level)
            .map_err(|err| RingbenchError::logging(err.to_string())),
    }
}

/// Install the global subscriber. Diagnostics go to stderr so the console
/// transcript on stdout stays clean.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| RingbenchError::logging(err.to_string()))
}
