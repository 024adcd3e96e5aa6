//! Logging setup.
//!
//! The TUI owns stdout, so everything goes to a daily rolling file under the
//! local data directory. `RUST_LOG` overrides the default filter and
//! `DEVSWIPE_LOG_DIR` overrides the location.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "devswipe=info,warn";

/// Environment variable that relocates the log directory.
pub const ENV_LOG_DIR: &str = "DEVSWIPE_LOG_DIR";

const LOG_FILE_PREFIX: &str = "devswipe.log";

/// Install the global subscriber writing to `log_directory()`.
pub fn init() -> anyhow::Result<()> {
    let log_dir = log_directory()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter_from(std::env::var("RUST_LOG").ok().as_deref()))
        .try_init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "devswipe starting");
    tracing::debug!(log_dir = %log_dir.display(), "Logging to file");
    Ok(())
}

/// Build the filter from a `RUST_LOG` value, falling back to the default.
fn filter_from(spec: Option<&str>) -> EnvFilter {
    spec.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Where log files are written.
pub fn log_directory() -> Option<PathBuf> {
    match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::data_local_dir().map(|base| base.join("devswipe").join("logs")),
    }
}

/// Log a clean shutdown.
pub fn shutdown() {
    tracing::info!("devswipe shutting down");
}
