//! Port-level error types.
//!
//! Open failures carry the device address (and the attempted parameters) for
//! diagnostics. Every read or write failure surfaces as `Timeout`; callers
//! that need to tell a deadline expiry from a device fault can ask `fault()`.

use super::driver::DriverError;
use super::line::LineParameters;
use std::time::Duration;
use thiserror::Error;

/// Which blocking operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
        }
    }
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DeviceOpenFailed,
    ParameterRejected,
    Timeout,
    NotOpen,
    AlreadyOpen,
    AlreadyClosed,
}

/// What actually went wrong underneath a `Timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFault {
    /// The deadline elapsed.
    Expired,
    /// The device reported an error.
    Device,
}

/// Errors returned by a timeout-bounded port.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("failed to open {address}: {source}")]
    DeviceOpenFailed {
        address: String,
        #[source]
        source: DriverError,
    },

    #[error("line parameters {params} rejected for {address}: {source}")]
    ParameterRejected {
        address: String,
        params: LineParameters,
        #[source]
        source: DriverError,
    },

    #[error("serial timeout: {operation} did not complete within {timeout:?}")]
    Timeout {
        operation: Operation,
        timeout: Duration,
        #[source]
        source: DriverError,
    },

    #[error("port is not open")]
    NotOpen,

    #[error("port is already open")]
    AlreadyOpen,

    #[error("port is already closed")]
    AlreadyClosed,
}

impl PortError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DeviceOpenFailed { .. } => ErrorKind::DeviceOpenFailed,
            Self::ParameterRejected { .. } => ErrorKind::ParameterRejected,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NotOpen => ErrorKind::NotOpen,
            Self::AlreadyOpen => ErrorKind::AlreadyOpen,
            Self::AlreadyClosed => ErrorKind::AlreadyClosed,
        }
    }

    /// Finer-grained cause of a `Timeout`, `None` for every other variant.
    pub fn fault(&self) -> Option<IoFault> {
        match self {
            Self::Timeout { source, .. } if source.is_timeout() => Some(IoFault::Expired),
            Self::Timeout { .. } => Some(IoFault::Device),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

impl From<PortError> for std::io::Error {
    fn from(err: PortError) -> Self {
        let kind = match err.kind() {
            ErrorKind::Timeout => std::io::ErrorKind::TimedOut,
            ErrorKind::NotOpen | ErrorKind::AlreadyClosed => std::io::ErrorKind::NotConnected,
            ErrorKind::AlreadyOpen => std::io::ErrorKind::AlreadyExists,
            ErrorKind::DeviceOpenFailed => std::io::ErrorKind::NotFound,
            ErrorKind::ParameterRejected => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}
