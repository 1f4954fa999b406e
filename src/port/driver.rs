//! Line driver adapter boundary.
//!
//! The timeout-bounded port depends on the OS serial layer only through these
//! two traits. `NativeDriver` implements them on top of the `serialport`
//! crate; `MockLineDriver` implements them in memory for tests.

use super::line::LineParameters;
use thiserror::Error;

/// Failures reported by a line driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The device path does not exist.
    #[error("no such device: {0}")]
    NotFound(String),

    /// The driver refused a parameter or request.
    #[error("rejected by driver: {0}")]
    Rejected(String),

    /// The deadline passed before the operation completed.
    #[error("timed out")]
    TimedOut,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl DriverError {
    /// Whether this is a deadline expiry rather than a device fault.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::TimedOut => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            Self::Serial(e) => matches!(
                e.kind(),
                serialport::ErrorKind::Io(std::io::ErrorKind::TimedOut)
            ),
            Self::NotFound(_) | Self::Rejected(_) => false,
        }
    }
}

/// Opens serial devices by path.
pub trait LineDriver: Send + Sync + std::fmt::Debug {
    /// Open the device at `path`. Line parameters are applied separately.
    fn open_path(&self, path: &str) -> Result<Box<dyn DeviceHandle>, DriverError>;
}

/// One opened serial device.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceHandle: Send + std::fmt::Debug {
    /// Apply baud rate, data bits, stop bits and parity.
    fn set_line_parameters(&mut self, params: &LineParameters) -> Result<(), DriverError>;

    /// Block until at least one byte arrives, the buffer is full, or
    /// `timeout_ms` elapses.
    fn blocking_read(&mut self, buffer: &mut [u8], timeout_ms: u64) -> Result<usize, DriverError>;

    /// Block until all of `data` is accepted or `timeout_ms` elapses.
    ///
    /// Returns the number of bytes accepted, which may be short if the
    /// deadline passed part way through.
    fn blocking_write(&mut self, data: &[u8], timeout_ms: u16) -> Result<usize, DriverError>;

    /// Release the device. Must tolerate being called more than once.
    fn close(&mut self);
}
