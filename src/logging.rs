//! Tracing setup
//!
//! The terminal belongs to the UI, so log lines go to a rolling file under
//! the log directory and never to stdout or stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "picpick";
const DEFAULT_FILTER: &str = "picpick=debug,warn";

/// Install the global subscriber writing to `<log_dir>/picpick.YYYY-MM-DD`.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Keep the returned guard alive
/// until shutdown; dropping it flushes pending lines.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    // disk writes happen off the UI thread
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "Logging to file");

    Ok(guard)
}
