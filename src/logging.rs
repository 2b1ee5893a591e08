//! File logging. The terminal belongs to the UI, so every event goes to a
//! log file instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "WFS_LOG";

/// Filter for `level` that keeps the HTTP stack quiet.
pub fn default_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!(
        "{},reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn",
        level
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `file`.
pub fn init(level: &str, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(file)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_env_filter(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_combined_with_quiet_http_targets() {
        let filter = default_env_filter("debug").to_string();
        assert!(filter.contains("debug"));
        assert!(filter.contains("reqwest=warn"));
    }
}
