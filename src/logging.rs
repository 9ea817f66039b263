//! Tracing setup.
//!
//! The terminal belongs to the visualizer, so log records go to a file
//! through a non-blocking writer.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "audiovis";
const LOG_FILE: &str = "audiovis.log";

/// Keeps the log writer thread alive; flushes on drop
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// `<cache dir>/audiovis/audiovis.log`, when the platform has a cache dir
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(LOG_DIR).join(LOG_FILE))
}

/// Level name to filter, INFO when unrecognized
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber writing to `path` (or the default file).
///
/// `RUST_LOG` takes precedence over `level`. Returns `None` when no log
/// location is available, in which case records are dropped.
pub fn init(path: Option<&Path>, level: &str) -> Result<Option<LogGuard>> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_log_path) else {
        return Ok(None);
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
    }
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file: {:?}", path))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized at level: {}", level);
    tracing::info!("Log file path: {:?}", path);

    Ok(Some(LogGuard { _guard: guard }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level("WARN"), LevelFilter::WARN);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("chatty"), LevelFilter::INFO);
    }

    #[test]
    fn test_default_path_is_under_app_dir() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("audiovis/audiovis.log"));
        }
    }
}
