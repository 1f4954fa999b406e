//! Line driver backed by the `serialport` crate.

use super::driver::{DeviceHandle, DriverError, LineDriver};
use super::line::LineParameters;
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::trace;

/// Baud rate used to open the device before the configured parameters are applied.
const PLACEHOLDER_BAUD: u32 = 9600;

/// Driver that talks to real serial devices through the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDriver;

impl NativeDriver {
    pub fn new() -> Self {
        Self
    }
}

impl LineDriver for NativeDriver {
    fn open_path(&self, path: &str) -> Result<Box<dyn DeviceHandle>, DriverError> {
        let port = serialport::new(path, PLACEHOLDER_BAUD)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => DriverError::NotFound(path.to_string()),
                _ => DriverError::Serial(e),
            })?;

        Ok(Box::new(NativeHandle {
            port: Some(port),
            name: path.to_string(),
        }))
    }
}

/// List the device paths the OS reports.
pub fn available_ports() -> Result<Vec<String>, DriverError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|info| info.port_name)
        .collect())
}

/// An open OS serial device.
pub struct NativeHandle {
    /// `None` once closed.
    port: Option<Box<dyn serialport::SerialPort>>,
    name: String,
}

impl NativeHandle {
    fn port_mut(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, DriverError> {
        self.port.as_mut().ok_or_else(handle_closed)
    }
}

fn handle_closed() -> DriverError {
    DriverError::Io(std::io::Error::new(
        std::io::ErrorKind::NotConnected,
        "device handle already closed",
    ))
}

fn rejected(what: &str, e: serialport::Error) -> DriverError {
    DriverError::Rejected(format!("{what}: {e}"))
}

impl DeviceHandle for NativeHandle {
    fn set_line_parameters(&mut self, params: &LineParameters) -> Result<(), DriverError> {
        let port = self.port_mut()?;
        port.set_baud_rate(params.baud_rate).map_err(|e| rejected("baud rate", e))?;
        port.set_data_bits(params.data_bits.into()).map_err(|e| rejected("data bits", e))?;
        port.set_parity(params.parity.into()).map_err(|e| rejected("parity", e))?;
        port.set_stop_bits(params.stop_bits.into()).map_err(|e| rejected("stop bits", e))?;
        Ok(())
    }

    fn blocking_read(&mut self, buffer: &mut [u8], timeout_ms: u64) -> Result<usize, DriverError> {
        let port = self.port_mut()?;
        port.set_timeout(Duration::from_millis(timeout_ms))?;

        match port.read(buffer) {
            Ok(0) => Err(DriverError::TimedOut),
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(DriverError::TimedOut),
            Err(e) => Err(DriverError::Io(e)),
        }
    }

    fn blocking_write(&mut self, data: &[u8], timeout_ms: u16) -> Result<usize, DriverError> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        let name = &self.name;
        let port = self.port.as_mut().ok_or_else(handle_closed)?;

        write_before(deadline, data, name, |chunk, remaining| {
            port.set_timeout(remaining)?;
            port.write(chunk)
        })
    }

    fn close(&mut self) {
        // Dropping the boxed port releases the descriptor.
        self.port.take();
    }
}

/// Feed `data` to `attempt` until it is all accepted or `deadline` passes.
///
/// Returns the count accepted so far once the deadline passes; nothing
/// accepted at all is `DriverError::TimedOut`.
fn write_before(
    deadline: Instant,
    data: &[u8],
    name: &str,
    mut attempt: impl FnMut(&[u8], Duration) -> std::io::Result<usize>,
) -> Result<usize, DriverError> {
    let mut written = 0;

    while written < data.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match attempt(&data[written..], remaining) {
            Ok(0) => break,
            Ok(n) => {
                written += n;
                trace!("{}: accepted {} of {} bytes", name, written, data.len());
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
            Err(e) => return Err(DriverError::Io(e)),
        }
    }

    if written == 0 && !data.is_empty() {
        return Err(DriverError::TimedOut);
    }
    Ok(written)
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeHandle")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}
