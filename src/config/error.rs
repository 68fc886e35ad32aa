//! Errors raised while loading or validating `folio.toml`.

use crate::analytics::AnalyticsError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("folio.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("folio.toml"));

        let validation_err = ConfigError::Validation("[base.url] is required".to_string());
        assert!(format!("{validation_err}").contains("[base.url] is required"));

        let analytics_err = ConfigError::from(AnalyticsError::MissingKey("app_id"));
        assert_eq!(
            format!("{analytics_err}"),
            "[analytics.app_id] is required when analytics is enabled"
        );
    }

    #[test]
    fn test_toml_error_keeps_source() {
        let err: ConfigError = toml::from_str::<toml::Value>("[base")
            .unwrap_err()
            .into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
