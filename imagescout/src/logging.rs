//! Logging initialization.
//!
//! Wires `tracing` output either to stderr or to a daily-rolling log
//! file. Filtering follows `RUST_LOG`, defaulting to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// With a `log_dir`, events go to a daily-rolling `imagescout.log` in
/// that directory and the returned guard must be held for the process
/// lifetime to flush the non-blocking writer. Without one, events go to
/// stderr and `None` is returned.
///
/// Call once per process; a second call is ignored.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "imagescout.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(LocalTime::rfc_3339())
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(LocalTime::rfc_3339())
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}
