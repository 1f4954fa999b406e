//! Deadline behavior of blocking reads and writes.

mod common;

use common::{mock_config, mock_config_with_timeout};
use fieldbus_serial::{open_with, ErrorKind, IoFault, MockLineDriver, Operation, PortError};
use std::time::{Duration, Instant};

#[test]
fn test_silent_line_times_out_within_window() {
    let driver = MockLineDriver::new();
    let mut port = open_with(driver, &mock_config_with_timeout(Duration::from_millis(50))).unwrap();

    let start = Instant::now();
    let err = port.read(&mut [0u8; 16]).unwrap_err();
    let elapsed = start.elapsed();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.fault(), Some(IoFault::Expired));
    assert!(elapsed >= Duration::from_millis(50), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(200), "blocked too long: {elapsed:?}");
}

#[test]
fn test_timeout_error_names_operation_and_deadline() {
    let driver = MockLineDriver::new();
    let mut port = open_with(driver, &mock_config_with_timeout(Duration::from_millis(10))).unwrap();

    match port.read(&mut [0u8; 1]).unwrap_err() {
        PortError::Timeout {
            operation, timeout, ..
        } => {
            assert_eq!(operation, Operation::Read);
            assert_eq!(timeout, Duration::from_millis(10));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn test_device_faults_share_the_timeout_kind() {
    let driver = MockLineDriver::echo();
    let mut port = open_with(driver.clone(), &mock_config()).unwrap();

    driver.fault_next_io();
    let err = port.write(&[0x01]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.fault(), Some(IoFault::Device));

    driver.fault_next_io();
    let err = port.read(&mut [0u8; 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.fault(), Some(IoFault::Device));

    // The port keeps working after a failed operation.
    assert_eq!(port.write(&[0x02]).unwrap(), 1);
    let mut buffer = [0u8; 1];
    assert_eq!(port.read(&mut buffer).unwrap(), 1);
    assert_eq!(buffer, [0x02]);
}

#[test]
fn test_driver_receives_millisecond_deadlines() {
    let driver = MockLineDriver::echo();
    let config = mock_config_with_timeout(Duration::from_micros(250_900));
    let mut port = open_with(driver.clone(), &config).unwrap();

    port.write(&[0xAA]).unwrap();
    port.read(&mut [0u8; 1]).unwrap();

    assert_eq!(driver.last_write_timeout_ms(), Some(250));
    assert_eq!(driver.last_read_timeout_ms(), Some(250));
}

#[test]
fn test_write_deadline_saturates_at_u16() {
    let driver = MockLineDriver::new();
    let config = mock_config_with_timeout(Duration::from_secs(90));
    let mut port = open_with(driver.clone(), &config).unwrap();

    port.write(&[0x00]).unwrap();
    assert_eq!(driver.last_write_timeout_ms(), Some(u16::MAX));
}

#[test]
fn test_io_error_kind_for_std_callers() {
    use std::io::Read;

    let driver = MockLineDriver::new();
    let mut port = open_with(driver, &mock_config_with_timeout(Duration::from_millis(5))).unwrap();

    let err = Read::read(&mut port, &mut [0u8; 4]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
}
