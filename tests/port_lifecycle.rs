//! Lifecycle tests for the timeout-bounded port.
//!
//! Covers the Unopened -> Open -> Closed state machine, open failure
//! handling, and the loopback scenario against the mock line driver.

mod common;

use common::{mock_config, MOCK_ADDRESS};
use fieldbus_serial::{
    open_with, BoundedPort, DataBits, ErrorKind, LineParameters, MockLineDriver, Parity,
    PortError, PortState, StopBits,
};
use pretty_assertions::assert_eq;

#[test]
fn test_echo_scenario() {
    let driver = MockLineDriver::echo();
    let mut port = BoundedPort::new(driver.clone());

    port.open(&mock_config()).unwrap();
    assert_eq!(port.state(), PortState::Open);

    assert_eq!(port.write(&[0x01, 0x02, 0x03]).unwrap(), 3);

    let mut buffer = [0u8; 3];
    assert_eq!(port.read(&mut buffer).unwrap(), 3);
    assert_eq!(buffer, [0x01, 0x02, 0x03]);

    port.close().unwrap();
    assert_eq!(port.state(), PortState::Closed);
    assert_eq!(driver.open_handles(), 0);
}

#[test]
fn test_open_applies_line_parameters() {
    let driver = MockLineDriver::new();
    let _port = open_with(driver.clone(), &mock_config()).unwrap();

    assert_eq!(driver.opened_paths(), vec![MOCK_ADDRESS.to_string()]);
    assert_eq!(
        driver.applied_parameters(),
        vec![LineParameters {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::Even,
        }]
    );
}

#[test]
fn test_device_open_failure_leaves_port_unopened() {
    let driver = MockLineDriver::new();
    driver.fail_open(true);
    let mut port = BoundedPort::new(driver.clone());

    let err = port.open(&mock_config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeviceOpenFailed);
    assert!(err.to_string().contains(MOCK_ADDRESS));
    assert_eq!(port.state(), PortState::Unopened);
    assert_eq!(driver.open_handles(), 0);

    // The port remains usable for a later, successful open.
    driver.fail_open(false);
    port.open(&mock_config()).unwrap();
    assert_eq!(port.state(), PortState::Open);
}

#[test]
fn test_parameter_rejection_releases_device() {
    let driver = MockLineDriver::new();
    driver.reject_parameters(true);
    let mut port = BoundedPort::new(driver.clone());

    let err = port.open(&mock_config()).unwrap_err();
    match &err {
        PortError::ParameterRejected { address, params, .. } => {
            assert_eq!(address, MOCK_ADDRESS);
            assert_eq!(params.baud_rate, 9600);
        }
        other => panic!("expected ParameterRejected, got {other:?}"),
    }
    assert_eq!(port.state(), PortState::Unopened);
    assert_eq!(driver.open_handles(), 0);
    assert_eq!(driver.close_count(), 1);
}

#[test]
fn test_open_helper_returns_first_error() {
    let driver = MockLineDriver::new();
    driver.fail_open(true);
    driver.reject_parameters(true);

    let err = open_with(driver, &mock_config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeviceOpenFailed);
}

#[test]
fn test_io_outside_open_state_fails() {
    let driver = MockLineDriver::echo();
    let mut port = BoundedPort::new(driver.clone());

    assert_eq!(port.read(&mut [0u8; 4]).unwrap_err().kind(), ErrorKind::NotOpen);
    assert_eq!(port.write(&[1]).unwrap_err().kind(), ErrorKind::NotOpen);

    port.open(&mock_config()).unwrap();
    port.close().unwrap();

    assert_eq!(
        port.read(&mut [0u8; 4]).unwrap_err().kind(),
        ErrorKind::AlreadyClosed
    );
    assert_eq!(
        port.write(&[1]).unwrap_err().kind(),
        ErrorKind::AlreadyClosed
    );
    assert!(driver.write_log().is_empty());
}

#[test]
fn test_close_is_idempotent() {
    let driver = MockLineDriver::new();
    let mut port = open_with(driver.clone(), &mock_config()).unwrap();

    port.close().unwrap();
    port.close().unwrap();
    assert_eq!(port.state(), PortState::Closed);
    assert_eq!(driver.close_count(), 1);
}

#[test]
fn test_close_without_open_succeeds() {
    let mut port = BoundedPort::new(MockLineDriver::new());
    port.close().unwrap();
    assert_eq!(port.state(), PortState::Closed);
}

#[test]
fn test_reopen_after_close_is_unsupported() {
    let driver = MockLineDriver::new();
    let mut port = open_with(driver.clone(), &mock_config()).unwrap();
    port.close().unwrap();

    let err = port.open(&mock_config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyClosed);
    assert_eq!(driver.opened_paths().len(), 1);

    // A fresh port on the same driver works.
    let fresh = open_with(driver.clone(), &mock_config()).unwrap();
    assert_eq!(fresh.state(), PortState::Open);
}

#[test]
fn test_partial_read() {
    let driver = common::mock_with_responses(&[&[0x11, 0x22]]);
    let mut port = open_with(driver, &mock_config()).unwrap();

    let mut buffer = [0u8; 8];
    assert_eq!(port.read(&mut buffer).unwrap(), 2);
    assert_eq!(&buffer[..2], &[0x11, 0x22]);
}

#[test]
fn test_chunked_reads_drain_in_order() {
    let driver = common::mock_with_responses(&[b"abcdef"]);
    driver.set_max_read_chunk(4);
    let mut port = open_with(driver.clone(), &mock_config()).unwrap();

    let mut buffer = [0u8; 8];
    let n = port.read(&mut buffer).unwrap();
    assert_eq!(&buffer[..n], b"abcd");
    let n = port.read(&mut buffer).unwrap();
    assert_eq!(&buffer[..n], b"ef");
    assert_eq!(driver.available_bytes(), 0);
}

#[test]
fn test_port_moves_across_threads() {
    let mut port = open_with(MockLineDriver::echo(), &mock_config()).unwrap();
    let handle = std::thread::spawn(move || {
        port.write(b"xyz").unwrap();
        let mut buffer = [0u8; 3];
        port.read(&mut buffer).unwrap();
        buffer
    });
    assert_eq!(&handle.join().unwrap(), b"xyz");
}
