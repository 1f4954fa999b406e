//! In-memory line driver for testing.
//!
//! `MockLineDriver` simulates a serial device without hardware. It can echo
//! written bytes back, serve a scripted receive queue, cap the number of bytes
//! returned per read, and inject open, parameter and I/O failures. All clones
//! share one state, so a test can keep a clone to inspect what the port did.

use super::driver::{DeviceHandle, DriverError, LineDriver};
use super::line::LineParameters;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct MockLineState {
    /// Written bytes become readable.
    echo: bool,
    /// Bytes returned by subsequent reads.
    read_queue: VecDeque<u8>,
    /// Upper bound on bytes returned by one read.
    max_read_chunk: Option<usize>,
    fail_open: bool,
    reject_parameters: bool,
    /// Next read or write fails with a device error.
    fault_next_io: bool,
    write_log: Vec<Vec<u8>>,
    applied_parameters: Vec<LineParameters>,
    opened_paths: Vec<String>,
    open_handles: usize,
    closes: usize,
    last_read_timeout_ms: Option<u64>,
    last_write_timeout_ms: Option<u16>,
}

/// Mock line driver.
///
/// # Example
/// ```
/// use fieldbus_serial::port::{MockLineDriver, PortConfig};
/// use std::time::Duration;
///
/// let driver = MockLineDriver::echo();
/// let config = PortConfig::new("/dev/ttyMOCK0").timeout(Duration::from_millis(100));
/// let mut port = fieldbus_serial::open_with(driver.clone(), &config).unwrap();
///
/// assert_eq!(port.write(&[0x01, 0x02, 0x03]).unwrap(), 3);
/// let mut buffer = [0u8; 3];
/// assert_eq!(port.read(&mut buffer).unwrap(), 3);
/// assert_eq!(buffer, [0x01, 0x02, 0x03]);
/// assert_eq!(driver.write_log(), vec![vec![0x01, 0x02, 0x03]]);
/// ```
#[derive(Clone, Default)]
pub struct MockLineDriver {
    state: Arc<Mutex<MockLineState>>,
}

impl MockLineDriver {
    /// A device that never produces data unless bytes are enqueued.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loopback device: every write is readable afterwards.
    pub fn echo() -> Self {
        let driver = Self::new();
        driver.state.lock().echo = true;
        driver
    }

    pub fn set_echo(&self, echo: bool) {
        self.state.lock().echo = echo;
    }

    /// Enqueue bytes to be returned by subsequent reads.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Return at most `chunk` bytes per read.
    pub fn set_max_read_chunk(&self, chunk: usize) {
        self.state.lock().max_read_chunk = Some(chunk);
    }

    /// Make `open_path` fail with `NotFound`.
    pub fn fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }

    /// Make `set_line_parameters` fail with `Rejected`.
    pub fn reject_parameters(&self, reject: bool) {
        self.state.lock().reject_parameters = reject;
    }

    /// Make the next read or write fail with a device error.
    pub fn fault_next_io(&self) {
        self.state.lock().fault_next_io = true;
    }

    pub fn write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().write_log.clone()
    }

    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }

    pub fn applied_parameters(&self) -> Vec<LineParameters> {
        self.state.lock().applied_parameters.clone()
    }

    pub fn opened_paths(&self) -> Vec<String> {
        self.state.lock().opened_paths.clone()
    }

    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.state.lock().open_handles
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    pub fn last_read_timeout_ms(&self) -> Option<u64> {
        self.state.lock().last_read_timeout_ms
    }

    pub fn last_write_timeout_ms(&self) -> Option<u16> {
        self.state.lock().last_write_timeout_ms
    }
}

impl LineDriver for MockLineDriver {
    fn open_path(&self, path: &str) -> Result<Box<dyn DeviceHandle>, DriverError> {
        let mut state = self.state.lock();
        if state.fail_open {
            return Err(DriverError::NotFound(path.to_string()));
        }

        state.opened_paths.push(path.to_string());
        state.open_handles += 1;

        Ok(Box::new(MockHandle {
            state: Arc::clone(&self.state),
            open: true,
        }))
    }
}

impl std::fmt::Debug for MockLineDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockLineDriver")
            .field("echo", &state.echo)
            .field("available_bytes", &state.read_queue.len())
            .field("open_handles", &state.open_handles)
            .finish()
    }
}

#[derive(Debug)]
struct MockHandle {
    state: Arc<Mutex<MockLineState>>,
    open: bool,
}

impl MockHandle {
    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.open {
            Ok(())
        } else {
            Err(DriverError::Io(std::io::Error::from(
                std::io::ErrorKind::NotConnected,
            )))
        }
    }
}

fn device_fault() -> DriverError {
    DriverError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "simulated device fault",
    ))
}

impl DeviceHandle for MockHandle {
    fn set_line_parameters(&mut self, params: &LineParameters) -> Result<(), DriverError> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        if state.reject_parameters {
            return Err(DriverError::Rejected(format!("unsupported parameters {params}")));
        }
        state.applied_parameters.push(*params);
        Ok(())
    }

    fn blocking_read(&mut self, buffer: &mut [u8], timeout_ms: u64) -> Result<usize, DriverError> {
        self.ensure_open()?;
        {
            let mut state = self.state.lock();
            state.last_read_timeout_ms = Some(timeout_ms);

            if state.fault_next_io {
                state.fault_next_io = false;
                return Err(device_fault());
            }

            if !state.read_queue.is_empty() {
                let limit = state.max_read_chunk.unwrap_or(usize::MAX).min(buffer.len());
                let mut n = 0;
                while n < limit {
                    match state.read_queue.pop_front() {
                        Some(byte) => {
                            buffer[n] = byte;
                            n += 1;
                        }
                        None => break,
                    }
                }
                return Ok(n);
            }
        }

        // Nothing buffered: wait out the deadline like a silent line would.
        std::thread::sleep(Duration::from_millis(timeout_ms));
        Err(DriverError::TimedOut)
    }

    fn blocking_write(&mut self, data: &[u8], timeout_ms: u16) -> Result<usize, DriverError> {
        self.ensure_open()?;
        let mut state = self.state.lock();
        state.last_write_timeout_ms = Some(timeout_ms);

        if state.fault_next_io {
            state.fault_next_io = false;
            return Err(device_fault());
        }

        state.write_log.push(data.to_vec());
        if state.echo {
            state.read_queue.extend(data);
        }
        Ok(data.len())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            let mut state = self.state.lock();
            state.open_handles -= 1;
            state.closes += 1;
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.close();
    }
}
