//! Timeout-bounded serial transport.
//!
//! `BoundedPort` owns one open device handle and bounds every read and write
//! by the timeout captured at open time. Devices are reached through the
//! `LineDriver`/`DeviceHandle` traits, implemented by `NativeDriver` for real
//! hardware and `MockLineDriver` for tests.

pub mod bounded;
pub mod config;
pub mod driver;
pub mod error;
pub mod line;
pub mod mock;
pub mod native;
pub mod timeouts;

pub use bounded::{new_port, open, open_with, BoundedPort, PortState, Transport};
pub use config::PortConfig;
pub use driver::{DeviceHandle, DriverError, LineDriver};
pub use error::{ErrorKind, IoFault, Operation, PortError};
pub use line::{DataBits, LineParameterError, LineParameters, Parity, StopBits};
pub use mock::MockLineDriver;
pub use native::{available_ports, NativeDriver};
