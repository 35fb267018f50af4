use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Settings;

const LOG_FILE: &str = "setlist.log";

/// Send `tracing` output to `setlist.log` in the configured log directory.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// Returns the writer guard, which must live until shutdown, or `None` when
/// no log directory is available.
pub fn init_logging(settings: &Settings) -> Option<WorkerGuard> {
    let dir = settings.log_dir()?;
    // Nowhere to report a failure here; run without logs.
    std::fs::create_dir_all(&dir).ok()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();

    installed.ok().map(|_| guard)
}
