//! Logging system initialization.
//!
//! Logs always go to stderr, since stdout carries MCP messages in STDIO
//! mode. When a log directory is configured, a daily-rotated file is written
//! there as well.

use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::LoggingConfig;
use super::error::{Error, Result};

/// Prefix of rotated log files, e.g. `amap-mcp.2026-10-16.log`.
const LOG_FILE_PREFIX: &str = "amap-mcp";

/// Rotated files kept on disk.
const MAX_LOG_FILES: usize = 3;

/// Map a configured level name to a tracing level, defaulting to INFO.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize the global tracing subscriber.
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for the lifetime of the program. It is `None` when no log
/// directory is configured.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = parse_level(&config.level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let console = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let console = if config.with_timestamps {
        console.boxed()
    } else {
        console.without_time().boxed()
    };

    let (file, guard) = match config.dir.as_deref() {
        Some(dir) => {
            let (layer, guard) = file_layer(dir)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file)
        .with(console)
        .with(filter)
        .try_init()
        .map_err(|e| Error::config(format!("failed to install tracing subscriber: {}", e)))?;

    if let Some(dir) = config.dir.as_deref() {
        tracing::info!("Writing logs to {}", dir.display());
    }

    Ok(guard)
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn file_layer(dir: &Path) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;

    let appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| Error::config(format!("cannot log to {}: {}", dir.display(), e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .boxed();

    Ok((layer, guard))
}
