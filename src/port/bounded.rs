//! Timeout-bounded serial port.
//!
//! A `BoundedPort` owns exactly one device handle while open and runs every
//! read and write against the deadline captured at open time.
//!
//! # Lifecycle
//!
//! ```text
//! Unopened ──open()──> Open ──close()──> Closed
//! ```
//!
//! `Closed` is terminal: reopening the same instance returns
//! `PortError::AlreadyClosed`. Construct a new port for each open/close cycle.
//!
//! # Concurrency
//!
//! Every operation takes `&mut self`, so the borrow checker guarantees a
//! single caller at a time. The port is `Send` and can move between threads;
//! sharing it requires external synchronization such as a `Mutex`.

use super::config::PortConfig;
use super::driver::{DeviceHandle, LineDriver};
use super::error::{Operation, PortError};
use super::native::NativeDriver;
use super::timeouts::{read_timeout_millis, write_timeout_millis};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Observable lifecycle state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    Unopened,
    Open,
    Closed,
}

/// Blocking, deadline-bounded byte transport.
///
/// This is the capability interface the higher field-bus layers program
/// against. `BoundedPort` is the implementation.
pub trait Transport: Send + std::fmt::Debug {
    /// Open the device and apply its line parameters.
    fn open(&mut self, config: &PortConfig) -> Result<(), PortError>;

    /// Read whatever arrives before the deadline, at most `buffer.len()` bytes.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Write `data`, blocking until the device accepts it or the deadline passes.
    fn write(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Release the device. Always succeeds.
    fn close(&mut self) -> Result<(), PortError>;

    fn state(&self) -> PortState;
}

#[derive(Debug)]
struct OpenLine {
    handle: Box<dyn DeviceHandle>,
    timeout: Duration,
    address: String,
}

#[derive(Debug)]
enum Lifecycle {
    Unopened,
    Open(OpenLine),
    Closed,
}

/// A serial line with timeout-bounded blocking reads and writes.
#[derive(Debug)]
pub struct BoundedPort {
    driver: Arc<dyn LineDriver>,
    lifecycle: Lifecycle,
}

impl BoundedPort {
    /// Create an unopened port that will open devices through `driver`.
    pub fn new(driver: impl LineDriver + 'static) -> Self {
        Self::with_shared_driver(Arc::new(driver))
    }

    /// Create an unopened port sharing an existing driver.
    pub fn with_shared_driver(driver: Arc<dyn LineDriver>) -> Self {
        Self {
            driver,
            lifecycle: Lifecycle::Unopened,
        }
    }

    /// Create an unopened port backed by the OS serial layer.
    pub fn native() -> Self {
        Self::new(NativeDriver::new())
    }

    pub fn state(&self) -> PortState {
        match self.lifecycle {
            Lifecycle::Unopened => PortState::Unopened,
            Lifecycle::Open(_) => PortState::Open,
            Lifecycle::Closed => PortState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Open(_))
    }

    /// Device path of the open line.
    pub fn address(&self) -> Option<&str> {
        match &self.lifecycle {
            Lifecycle::Open(line) => Some(&line.address),
            _ => None,
        }
    }

    /// Deadline captured at open time.
    pub fn timeout(&self) -> Option<Duration> {
        match &self.lifecycle {
            Lifecycle::Open(line) => Some(line.timeout),
            _ => None,
        }
    }

    /// Open the device named by `config.address` and apply its line parameters.
    ///
    /// On failure the port stays `Unopened`. If the parameters are rejected
    /// after the device opened, the handle is closed before returning.
    pub fn open(&mut self, config: &PortConfig) -> Result<(), PortError> {
        match self.lifecycle {
            Lifecycle::Unopened => {}
            Lifecycle::Open(_) => return Err(PortError::AlreadyOpen),
            Lifecycle::Closed => return Err(PortError::AlreadyClosed),
        }

        let params = config.line_parameters();

        let mut handle = self.driver.open_path(&config.address).map_err(|source| {
            warn!("Open {} failed: {}", config.address, source);
            PortError::DeviceOpenFailed {
                address: config.address.clone(),
                source,
            }
        })?;

        if let Err(source) = handle.set_line_parameters(&params) {
            warn!("Open {} with {} failed: {}", config.address, params, source);
            handle.close();
            return Err(PortError::ParameterRejected {
                address: config.address.clone(),
                params,
                source,
            });
        }

        debug!(
            "Opened {} at {} with timeout {:?}",
            config.address, params, config.timeout
        );
        self.lifecycle = Lifecycle::Open(OpenLine {
            handle,
            timeout: config.timeout,
            address: config.address.clone(),
        });
        Ok(())
    }

    fn line_mut(&mut self) -> Result<&mut OpenLine, PortError> {
        match &mut self.lifecycle {
            Lifecycle::Open(line) => Ok(line),
            Lifecycle::Unopened => Err(PortError::NotOpen),
            Lifecycle::Closed => Err(PortError::AlreadyClosed),
        }
    }

    /// Block until at least one byte arrives, the buffer fills, or the
    /// deadline passes.
    ///
    /// Partial reads are not errors. Any driver failure, including a device
    /// fault, is reported as `PortError::Timeout`; see `PortError::fault`.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let line = self.line_mut()?;
        if buffer.is_empty() {
            return Ok(0);
        }

        let timeout_ms = read_timeout_millis(line.timeout);
        match line.handle.blocking_read(buffer, timeout_ms) {
            Ok(n) => {
                debug!("Read {} bytes from {}", n, line.address);
                Ok(n)
            }
            Err(source) => {
                debug!("Read from {} failed: {}", line.address, source);
                Err(PortError::Timeout {
                    operation: Operation::Read,
                    timeout: line.timeout,
                    source,
                })
            }
        }
    }

    /// Block until the device accepts `data` or the deadline passes.
    ///
    /// The driver deadline is the configured timeout in whole milliseconds,
    /// saturating at 65535ms. Returns the number of bytes accepted, which
    /// callers should compare against `data.len()`.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let line = self.line_mut()?;

        let timeout_ms = write_timeout_millis(line.timeout);
        match line.handle.blocking_write(data, timeout_ms) {
            Ok(n) => {
                if n < data.len() {
                    warn!("Short write to {}: {} of {} bytes", line.address, n, data.len());
                } else {
                    debug!("Wrote {} bytes to {}", n, line.address);
                }
                Ok(n)
            }
            Err(source) => {
                warn!("Write to {} failed: {}", line.address, source);
                Err(PortError::Timeout {
                    operation: Operation::Write,
                    timeout: line.timeout,
                    source,
                })
            }
        }
    }

    /// Release the device handle and move to `Closed`.
    ///
    /// Closing an unopened or already closed port succeeds.
    pub fn close(&mut self) -> Result<(), PortError> {
        if let Lifecycle::Open(mut line) = std::mem::replace(&mut self.lifecycle, Lifecycle::Closed)
        {
            line.handle.close();
            debug!("Closed {}", line.address);
        }
        Ok(())
    }
}

impl Drop for BoundedPort {
    fn drop(&mut self) {
        if let Lifecycle::Open(line) = &mut self.lifecycle {
            line.handle.close();
        }
    }
}

impl Transport for BoundedPort {
    fn open(&mut self, config: &PortConfig) -> Result<(), PortError> {
        BoundedPort::open(self, config)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        BoundedPort::read(self, buffer)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, PortError> {
        BoundedPort::write(self, data)
    }

    fn close(&mut self) -> Result<(), PortError> {
        BoundedPort::close(self)
    }

    fn state(&self) -> PortState {
        BoundedPort::state(self)
    }
}

impl std::io::Read for BoundedPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        BoundedPort::read(self, buf).map_err(Into::into)
    }
}

impl std::io::Write for BoundedPort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        BoundedPort::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Create an unopened port backed by the OS serial layer.
pub fn new_port() -> Box<dyn Transport> {
    Box::new(BoundedPort::native())
}

/// Construct a native port and open it in one step.
pub fn open(config: &PortConfig) -> Result<BoundedPort, PortError> {
    open_with(NativeDriver::new(), config)
}

/// Construct a port on `driver` and open it in one step.
pub fn open_with(
    driver: impl LineDriver + 'static,
    config: &PortConfig,
) -> Result<BoundedPort, PortError> {
    let mut port = BoundedPort::new(driver);
    port.open(config)?;
    Ok(port)
}
