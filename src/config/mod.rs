//! Configuration module for fieldbus-serial.
//!
//! The transport core never reads files or the environment itself; this
//! module produces the `PortConfig` it consumes.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `FIELDBUS_SERIAL_CONFIG` environment variable (explicit path)
//! 2. `./fieldbus-serial.toml` (current directory)
//! 3. `~/.config/fieldbus-serial/config.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\fieldbus-serial\config.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `FIELDBUS_SERIAL_<SECTION>_<KEY>`, for example:
//! - `FIELDBUS_SERIAL_SERIAL_ADDRESS=/dev/ttyUSB0`
//! - `FIELDBUS_SERIAL_SERIAL_PARITY=N`
//! - `FIELDBUS_SERIAL_LOGGING_LEVEL=debug`
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldbus_serial::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let port_config = loader.config().serial.to_port_config();
//! println!("Opening {} at {}", port_config.address, port_config.line_parameters());
//! # Ok::<(), fieldbus_serial::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, SerialSection};
