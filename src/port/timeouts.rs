//! Conversions from the configured timeout to the units drivers accept.
//!
//! Both directions use whole milliseconds. Sub-millisecond remainders are
//! truncated and values too large for the target width saturate.

use std::time::Duration;

/// Read deadline in whole milliseconds.
pub fn read_timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Write deadline in whole milliseconds, saturating at 65535ms.
pub fn write_timeout_millis(timeout: Duration) -> u16 {
    u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_sub_millisecond() {
        assert_eq!(read_timeout_millis(Duration::from_micros(1999)), 1);
        assert_eq!(write_timeout_millis(Duration::from_micros(1999)), 1);
        assert_eq!(read_timeout_millis(Duration::from_micros(999)), 0);
    }

    #[test]
    fn test_write_saturates() {
        assert_eq!(write_timeout_millis(Duration::from_millis(65535)), 65535);
        assert_eq!(write_timeout_millis(Duration::from_millis(65536)), u16::MAX);
        assert_eq!(write_timeout_millis(Duration::from_secs(3600)), u16::MAX);
    }

    #[test]
    fn test_read_saturates() {
        assert_eq!(read_timeout_millis(Duration::MAX), u64::MAX);
    }
}
