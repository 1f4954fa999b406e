//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section falls back to its defaults, so a file only needs the keys it
//! changes.

use super::error::{ConfigError, ConfigResult};
use crate::port::config::{
    DEFAULT_BAUD_RATE, DEFAULT_DATA_BITS, DEFAULT_PARITY, DEFAULT_STOP_BITS, DEFAULT_TIMEOUT_MS,
};
use crate::port::{DataBits, Parity, PortConfig, StopBits};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial line configuration
    pub serial: SerialSection,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values the transport would otherwise pass through blindly.
    pub fn validate(&self) -> ConfigResult<()> {
        self.serial.validate()
    }
}

/// Serial line section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    /// Device path
    pub address: String,
    /// Baud rate (default 19200)
    pub baud_rate: u32,
    /// Data bits: 5, 6, 7 or 8 (default 8)
    pub data_bits: DataBits,
    /// Stop bits: 1 or 2 (default 1)
    pub stop_bits: StopBits,
    /// Parity: N, E or O (default E). No parity calls for 2 stop bits.
    pub parity: Parity,
    /// Read/write timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            address: default_address().to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: DEFAULT_STOP_BITS,
            parity: DEFAULT_PARITY,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

fn default_address() -> &'static str {
    if cfg!(windows) {
        "COM1"
    } else {
        "/dev/ttyS0"
    }
}

impl SerialSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn to_port_config(&self) -> PortConfig {
        PortConfig {
            address: self.address.clone(),
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            stop_bits: self.stop_bits,
            parity: self.parity,
            timeout: self.timeout(),
        }
    }

    /// Reject values no serial line can use.
    ///
    /// No parity with a single stop bit is only warned about; plenty of
    /// devices on the bus run that way despite the framing rule.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::validation("serial.address", "must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::validation("serial.baud_rate", "must be positive"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::validation("serial.timeout_ms", "must be positive"));
        }
        if self.parity == Parity::None && self.stop_bits == StopBits::One {
            warn!(
                "{}: no parity with 1 stop bit; the field-bus framing rule expects 2",
                self.address
            );
        }
        Ok(())
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
    /// Log file path; stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}
