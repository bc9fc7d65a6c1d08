//! Log output for the CLI.
//!
//! Events go to stderr because stdout carries the wizard dialogue, and are
//! optionally appended to a file. `RUST_LOG` takes precedence over the
//! configured level.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Level used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Timestamps in local time with the UTC offset.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Builds the event filter: `RUST_LOG` when set, otherwise `level`.
///
/// `level` is a bare level ("debug") or any `EnvFilter` directive
/// ("rug_core=trace,info").
fn filter(level: &str) -> Result<EnvFilter> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env().context("invalid RUST_LOG");
    }
    parse_level(level)
}

fn parse_level(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
}

/// Opens `path` for appending. The directory must already exist.
fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber. Call once at startup, after the
/// configuration is known.
///
/// # Errors
///
/// An invalid level directive or an unopenable log file. A subscriber that
/// is already installed is left in place.
pub fn init_logging(
    level: &str,
    file: Option<&Path>,
) -> Result<()> {
    let filter = filter(level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTime)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = file
        .map(open_log_file)
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTime)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Logs a background task failure with context.
pub fn log_task_error(
    task_name: &'static str,
    result: Result<()>,
) {
    if let Err(error) = result {
        error!(task = task_name, ?error, "background task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_accepts_bare_levels_and_directives() {
        assert!(parse_level(DEFAULT_LOG_LEVEL).is_ok());
        assert!(parse_level("debug").is_ok());
        assert!(parse_level("rug_core=trace,info").is_ok());
    }

    #[test]
    fn level_rejects_garbage() {
        let err = parse_level("rug_cli=loud").unwrap_err();

        assert!(err.to_string().contains("rug_cli=loud"));
    }

    #[test]
    fn log_file_is_created_for_appending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rug.log");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn log_file_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("rug.log");

        assert!(open_log_file(&path).is_err());
    }

    #[test]
    fn init_twice_keeps_first_subscriber() {
        assert!(init_logging(DEFAULT_LOG_LEVEL, None).is_ok());
        assert!(init_logging("debug", None).is_ok());
    }
}
