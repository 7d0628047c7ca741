//! Tracing subscriber setup

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Verbosity selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Info,
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Info => "techlag=info",
            LogLevel::Debug => "techlag=debug",
        }
    }
}

/// Build the filter: an explicit level wins, then `RUST_LOG`, then warnings only
pub fn filter(level: Option<LogLevel>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level.directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("techlag=warn")),
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr, or to `logfile` (truncated) when given. The returned guard
/// must be held until exit so buffered file output is flushed.
pub fn init(level: Option<LogLevel>, logfile: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = filter(level);

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(filter)
                .try_init()?;
            Ok(None)
        }
    }
}
