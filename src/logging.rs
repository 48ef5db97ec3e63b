//! File-based tracing setup.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Default log location when `--log-file` is not given.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("task_countdown.log")
}

/// Open a non-rotating appender for `log_path`, creating its directory.
fn file_appender(log_path: &Path) -> Option<RollingFileAppender> {
    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_path.file_name()?.to_str()?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(log_dir)
        .ok()
}

/// Initialise file-based logging.
///
/// Logs never go to stdout, since the TUI owns the terminal. `RUST_LOG`
/// overrides `level` when set. The returned guard must be held until
/// shutdown so buffered entries are flushed. Returns `None`, leaving logging
/// off, when the path has no usable file name or can't be opened.
pub fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = default_log_path();
    let log_path = file_path.unwrap_or(&default_path);

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(log_path)?);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
