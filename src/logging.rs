//! Tracing setup for the reader service.
//!
//! Every event is printed to stdout and mirrored to a log file. `READABILITY_LOG_FILE`
//! names the file to append to; without it, events go to `logs/readability.log`. Filtering
//! follows `RUST_LOG` and falls back to `info`.
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "READABILITY_LOG_FILE";
const LOG_DIR: &str = "logs";
const LOG_FILE_NAME: &str = "readability.log";

/// Flushes buffered file output on shutdown; must outlive the subscriber.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where the file layer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogDestination {
    /// Append to an operator-chosen file.
    Append(PathBuf),
    /// Write `LOG_FILE_NAME` inside `LOG_DIR`, creating the directory first.
    DefaultDir,
}

impl LogDestination {
    fn from_setting(setting: Option<String>) -> Self {
        match setting.filter(|path| !path.trim().is_empty()) {
            Some(path) => Self::Append(PathBuf::from(path)),
            None => Self::DefaultDir,
        }
    }

    fn open(&self) -> std::io::Result<NonBlocking> {
        let (writer, guard) = match self {
            Self::Append(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                tracing_appender::non_blocking(file)
            }
            Self::DefaultDir => {
                fs::create_dir_all(LOG_DIR)?;
                tracing_appender::non_blocking(tracing_appender::rolling::never(
                    LOG_DIR,
                    LOG_FILE_NAME,
                ))
            }
        };
        let _ = FILE_GUARD.set(guard);
        Ok(writer)
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// A log file that cannot be opened is reported on stderr and skipped; stdout logging
/// still comes up.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact());

    let destination = LogDestination::from_setting(std::env::var(LOG_FILE_ENV).ok());
    match destination.open() {
        Ok(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        Err(err) => {
            eprintln!("File logging disabled ({destination:?}): {err}");
            registry.init();
        }
    }
}
