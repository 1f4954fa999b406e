//! Fieldbus Serial Library
//!
//! A serial-line transport for Modbus RTU and similar field-bus stacks: open a
//! device with configurable line parameters, then perform blocking reads and
//! writes that either complete within a deadline or fail with a timeout.
//!
//! # Modules
//!
//! - `port`: timeout-bounded port, line driver boundary, native and mock drivers
//! - `config`: TOML configuration with environment overrides
//! - `logging`: `tracing` subscriber setup for binaries
//!
//! # Example
//!
//! ```no_run
//! use fieldbus_serial::{Parity, PortConfig, StopBits};
//! use std::time::Duration;
//!
//! let config = PortConfig::new("/dev/ttyUSB0")
//!     .baud_rate(9600)
//!     .parity(Parity::None)
//!     .stop_bits(StopBits::Two)
//!     .timeout(Duration::from_millis(200));
//!
//! let mut port = fieldbus_serial::open(&config)?;
//! port.write(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A])?;
//! let mut response = [0u8; 256];
//! let n = port.read(&mut response)?;
//! println!("{} bytes", n);
//! port.close()?;
//! # Ok::<(), fieldbus_serial::PortError>(())
//! ```

pub mod config;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use port::{
    new_port, open, open_with, BoundedPort, DataBits, DeviceHandle, DriverError, ErrorKind,
    IoFault, LineDriver, LineParameters, MockLineDriver, NativeDriver, Operation, Parity,
    PortConfig, PortError, PortState, StopBits, Transport,
};

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
