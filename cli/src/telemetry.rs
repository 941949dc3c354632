//! Tracing of the tool itself, configured from the `[logging]` table.
//!
//! Pipeline diagnostics go through the run's log sink, not through here.

use std::path::PathBuf;
use std::sync::OnceLock;

use semflow_core::config::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_tracing(logging: &LoggingConfig) -> Result<(), CliError> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&logging.level)
        .map_err(|e| CliError::Config(format!("logging.level {:?}: {e}", logging.level)))?;

    let file_layer = if logging.file {
        let writer = log_file_writer(logging.directory.as_deref())?;
        Some(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
    } else {
        None
    };
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    // A subscriber installed earlier in the process wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Non-blocking writer onto `<directory>/semflow.<pid>.log`, creating the
/// directory if needed. Falls back to the OS temp dir.
pub fn log_file_writer(directory: Option<&str>) -> Result<NonBlocking, CliError> {
    let dir = match directory.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => PathBuf::from(d),
        None => std::env::temp_dir().join("semflow"),
    };
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(dir, format!("semflow.{}.log", std::process::id()));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        log_file_writer(dir.to_str()).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn unusable_log_directory_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, "not a directory").unwrap();

        let err = log_file_writer(file.join("logs").to_str()).unwrap_err();
        assert!(matches!(err, CliError::Io(_)), "{err:?}");
        assert_eq!(err.exit_code(), 20);
    }

    #[test]
    fn bad_filter_is_a_config_error() {
        let logging = LoggingConfig {
            level: "semflow=loud".into(),
            ..LoggingConfig::default()
        };
        let err = init_tracing(&logging).unwrap_err();
        assert!(matches!(err, CliError::Config(_)), "{err:?}");
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn disabled_tracing_installs_nothing() {
        let logging = LoggingConfig {
            enabled: false,
            file: true,
            directory: Some("never-created".into()),
            ..LoggingConfig::default()
        };
        assert!(init_tracing(&logging).is_ok());
    }
}
