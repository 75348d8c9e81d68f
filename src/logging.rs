use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Logs go to stderr unless `APIARY_LOG_DIR` is set, in which case they go
/// to a daily-rolling file in that directory. The returned guard flushes the
/// file writer on drop and must be held for the life of the program.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("apiary=debug")
    } else {
      EnvFilter::new("apiary=info")
    }
  });

  if let Some(log_dir) = std::env::var_os("APIARY_LOG_DIR").map(PathBuf::from) {
    let appender = tracing_appender::rolling::daily(log_dir, "apiary.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
      .with(filter)
      .with(
        tracing_subscriber::fmt::layer()
          .with_writer(writer)
          .with_ansi(false),
      )
      .init();
    return Some(guard);
  }

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
  None
}
