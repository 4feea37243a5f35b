//! Tracing setup for the `LoanIntake` binary.
//!
//! Everything is decided once from [`LogConfig`]: the filter (explicit
//! level, else `RUST_LOG`, else `info,loan_ui=debug`), whether events go to
//! the console, and an optional append-only log file. Console output goes to
//! stderr so command results on stdout stay clean.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "info,loan_ui=debug";
const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S%.3f";
const FILE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot open log file '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logging is already initialised")]
    AlreadyInitialised(#[source] TryInitError),
}

/// Filter for `level`, or the environment/default filter when unset.
pub fn filter_for(level: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match level {
        Some(directive) => EnvFilter::try_new(directive).map_err(|source| LoggingError::Filter {
            directive: directive.to_string(),
            source,
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::File {
            path: path.to_path_buf(),
            source,
        })
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = filter_for(config.level.as_deref())?;

    let console = config.console.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(ChronoLocal::new(CONSOLE_TIME_FORMAT.to_string()))
            .with_target(false)
    });

    let file = match &config.file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };
    let file = file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(LoggingError::AlreadyInitialised)
}
