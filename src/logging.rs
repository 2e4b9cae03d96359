//! Log file setup and the switch that gates every log line.
//!
//! Logging is off unless the configuration turns it on. When it is on, a
//! `tracing` subscriber writes plain lines to the configured log file, which
//! is truncated at the start of each run.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

const DEFAULT_FILTER: &str = "fragsort=debug";
const TIMESTAMP_FORMAT: &str = "%d-%b-%y %H:%M:%S";

/// Errors that can occur while installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("A global log subscriber is already installed")]
    AlreadyInstalled,
}

/// Installs the global subscriber writing to `log_file`.
///
/// `RUST_LOG` overrides the default `fragsort=debug` filter.
pub fn init_file_logging(log_file: &Path) -> Result<(), LoggingError> {
    let file = open_log_file(log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing::subscriber::set_global_default(file_subscriber(file, filter))
        .map_err(|_| LoggingError::AlreadyInstalled)
}

/// Creates `log_file`, truncating what a previous run left there.
fn open_log_file(log_file: &Path) -> Result<File, LoggingError> {
    File::create(log_file).map_err(|source| LoggingError::OpenFailed {
        path: log_file.to_path_buf(),
        source,
    })
}

fn file_subscriber(file: File, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .finish()
}

/// Forwards log events to `tracing` only when logging is enabled.
///
/// The provisioner and the sorter take a `Journal` instead of calling the
/// macros directly, so a disabled run emits no events at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Journal {
    enabled: bool,
}

impl Journal {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A journal that never emits.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn debug(&self, message: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::debug!("{}", message);
        }
    }

    pub fn info(&self, message: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::info!("{}", message);
        }
    }

    pub fn error(&self, message: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::error!("{}", message);
        }
    }
}
