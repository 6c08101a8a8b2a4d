//! Global `tracing` subscriber for the binary.
//!
//! Diagnostics go to stderr; stdout is reserved for `--echo`. `RUST_LOG` picks
//! the level (default `info`), `RMATGEN_LOG_FORMAT` picks `human` or `json`.

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FORMAT_ENV: &str = "RMATGEN_LOG_FORMAT";

static INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("RMATGEN_LOG_FORMAT is not valid UTF-8")]
    NotUnicode,
    #[error("unknown log format `{0}`; expected `human` or `json`")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnknownFormat(other.to_owned())),
        }
    }
}

impl LogFormat {
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
            Err(env::VarError::NotUnicode(_)) => Err(LoggingError::NotUnicode),
        }
    }
}

/// Installs the subscriber on first call. Later calls, and a subscriber
/// already installed by someone else, are not errors.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let format = LogFormat::from_env()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    match tracing_subscriber::registry().with(filter).with(layer).try_init() {
        Ok(()) => {}
        Err(err) => tracing::debug!(error = %err, "keeping existing subscriber"),
    }
    let _ = INSTALLED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn test_parse_log_format(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(expected, raw.parse::<LogFormat>().unwrap());
    }

    #[test]
    fn test_unknown_log_format() {
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(matches!(err, LoggingError::UnknownFormat(ref f) if f == "xml"));
        assert_eq!("unknown log format `xml`; expected `human` or `json`", err.to_string());
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging().unwrap();
        init_logging().unwrap();
    }
}
