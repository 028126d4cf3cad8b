//! Tracing subscriber setup.
//!
//! The TUI owns stdout/stderr, so log events go to a daily-rolling file under
//! `${NAMECLAIM_HOME}/logs`. `NAMECLAIM_LOG` overrides the configured filter.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;

/// Environment variable overriding `log.level`.
pub const LOG_ENV: &str = "NAMECLAIM_LOG";

const LOG_FILE_PREFIX: &str = "nameclaim.log";

/// Builds the filter from `NAMECLAIM_LOG`, falling back to the configured level.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `dir`.
///
/// Keep the returned guard alive for the lifetime of the process; dropping it
/// flushes buffered events.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig, dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let config = LogConfig {
            level: "not a [valid] directive".to_string(),
        };
        let filter = env_filter(&config);
        assert!(!filter.to_string().is_empty());
    }
}
