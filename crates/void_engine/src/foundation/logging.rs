//! Logging bootstrap on top of `env_logger`
//!
//! The engine logs through the `log` facade. This module installs the global
//! logger once, optionally appending to a log file instead of stderr.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub use log::{debug, error, info, trace, warn};

/// Logging errors
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Level string is not a known `log` level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}

/// Logger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter (`off`, `error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,

    /// Append log lines to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parsed level filter
    pub fn level_filter(&self) -> Result<LevelFilter, LoggingError> {
        LevelFilter::from_str(&self.level).map_err(|_| LoggingError::InvalidLevel(self.level.clone()))
    }
}

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    // A logger may already be installed by a test harness or host application
    let _ = env_logger::try_init();
}

/// Initialize the logging system from a config.
///
/// `RUST_LOG` directives still apply on top of the configured level. Calling
/// this after a logger is installed leaves the existing logger in place.
pub fn init_with_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    let level = config.level_filter()?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(directives) = std::env::var("RUST_LOG") {
        builder.parse_filters(&directives);
    }

    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::Io {
                path: path.clone(),
                source,
            })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing logger");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        let config = LoggingConfig::default();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);

        let bad = LoggingConfig {
            level: "loud".to_string(),
            file: None,
        };
        assert!(matches!(bad.level_filter(), Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_unopenable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("x.log");
        let config = LoggingConfig {
            level: "info".to_string(),
            file: Some(path.clone()),
        };

        match init_with_config(&config) {
            Err(LoggingError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("void_contingency.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        assert!(init_with_config(&config).is_ok());
        assert!(path.is_file());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        assert!(init_with_config(&LoggingConfig::default()).is_ok());
    }
}
