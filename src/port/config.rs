//! Port configuration.

use super::line::{DataBits, LineParameters, Parity, StopBits};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Field-bus defaults used by the configuration loader and `PortConfig::new`.
pub const DEFAULT_BAUD_RATE: u32 = 19200;
pub const DEFAULT_DATA_BITS: DataBits = DataBits::Eight;
pub const DEFAULT_STOP_BITS: StopBits = StopBits::One;
pub const DEFAULT_PARITY: Parity = Parity::Even;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Everything needed to open one serial line.
///
/// Fields are passed through to the driver unchanged. In particular the
/// field-bus rule that no parity requires two stop bits is not enforced here;
/// the configuration loader warns about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfig {
    /// Device path, e.g. `/dev/ttyS0` or `COM3`.
    pub address: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    /// Read/write deadline, copied into the port at open time.
    pub timeout: Duration,
}

impl PortConfig {
    /// Start from the field-bus defaults (19200 8E1, 1s timeout).
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DEFAULT_DATA_BITS,
            stop_bits: DEFAULT_STOP_BITS,
            parity: DEFAULT_PARITY,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The subset of this configuration the driver applies to the line.
    pub fn line_parameters(&self) -> LineParameters {
        LineParameters {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            stop_bits: self.stop_bits,
            parity: self.parity,
        }
    }
}
