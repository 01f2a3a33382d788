//! Tracing setup for the ytmb binary.
//!
//! Two sinks are installed: a file that always receives DEBUG output, and
//! stderr, which only shows warnings unless debug mode is on. Console lines
//! meant for the user do not go through here, they use the colored macros.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::Settings;

const DEFAULT_FILE_FILTER: &str = "ytmb=debug,warn";

/// Initialize logging.
///
/// `RUST_LOG` overrides the file filter. The returned guard flushes the file
/// writer on drop and must be held for the lifetime of the program.
pub fn init(settings: &Settings, log_path: &Path) -> std::io::Result<WorkerGuard> {
    let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;
    let file_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "debug.log".into());

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILE_FILTER));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(file_filter);

    let console_level = if settings.debug { "ytmb=debug,warn" } else { "warn" };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(EnvFilter::new(console_level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(path = %log_path.display(), "logging initialized");

    Ok(guard)
}
