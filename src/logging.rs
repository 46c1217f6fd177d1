//! Logging through `tracing`.
//!
//! The terminal is in raw mode while the quiz runs, so output goes to a file.
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;
use crate::error::{QuizError, Result};

/// Install the global subscriber. Returns `false` when logging is disabled.
pub fn init_logging(config: &LogConfig) -> Result<bool> {
    let Some(path) = &config.file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| QuizError::Logging(format!("cannot open {}: {e}", path.display())))?;

    let filter = build_env_filter(&config.level);
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| QuizError::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(true)
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
