//! Shared test utilities for the transport tests.

#![allow(dead_code)]

use fieldbus_serial::{MockLineDriver, Parity, PortConfig, StopBits};
use std::time::Duration;

pub const MOCK_ADDRESS: &str = "/dev/ttyMOCK0";

/// The reference configuration: 9600 8E1, 100ms timeout.
pub fn mock_config() -> PortConfig {
    PortConfig::new(MOCK_ADDRESS)
        .baud_rate(9600)
        .parity(Parity::Even)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(100))
}

pub fn mock_config_with_timeout(timeout: Duration) -> PortConfig {
    mock_config().timeout(timeout)
}

/// A mock driver preloaded with bytes to be read.
pub fn mock_with_responses(responses: &[&[u8]]) -> MockLineDriver {
    let driver = MockLineDriver::new();
    for response in responses {
        driver.enqueue_read(response);
    }
    driver
}
