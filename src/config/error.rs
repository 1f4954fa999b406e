//! Errors raised while resolving, loading or saving the serial configuration.

use crate::port::LineParameterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly named config file does not exist
    #[error("no serial configuration at {0}")]
    NotFound(PathBuf),

    #[error("cannot read serial configuration {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed serial configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("cannot encode serial configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("cannot write serial configuration {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value no serial line can run with, such as a zero baud rate
    #[error("{key} {message}")]
    ValidationError { key: String, message: String },

    /// An override that is not a number where one is expected
    #[error("{var} is not a valid {expected}")]
    EnvParseError { var: String, expected: &'static str },

    /// A numeric or letter override outside the serial framing vocabulary
    #[error("{var}: {source}")]
    LineParameter {
        var: String,
        #[source]
        source: LineParameterError,
    },
}

impl ConfigError {
    pub fn validation<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env_parse(var: impl Into<String>, expected: &'static str) -> Self {
        Self::EnvParseError {
            var: var.into(),
            expected,
        }
    }

    pub fn line_parameter(var: impl Into<String>, source: LineParameterError) -> Self {
        Self::LineParameter {
            var: var.into(),
            source,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_key() {
        let err = ConfigError::validation("serial.timeout_ms", "must be positive");
        assert_eq!(err.to_string(), "serial.timeout_ms must be positive");

        let err = ConfigError::env_parse("FIELDBUS_SERIAL_SERIAL_BAUD_RATE", "baud rate");
        assert_eq!(
            err.to_string(),
            "FIELDBUS_SERIAL_SERIAL_BAUD_RATE is not a valid baud rate"
        );
    }
}
