//! Units formatting and conversion utilities
//!
//! Sizes in this crate are MiB-based: one "MB" on the command line and in
//! reports is 1,048,576 bytes.

use std::time::Duration;

/// Bytes in one MB as used by `--size` and all reports.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert a size in MB to bytes, returning `None` on overflow.
pub fn mb_to_bytes(mb: u64) -> Option<u64> {
    mb.checked_mul(BYTES_PER_MB)
}

/// Convert bytes to fractional MB
///
/// # Examples
/// ```
/// use filebench::util::units::bytes_to_mb;
///
/// assert_eq!(bytes_to_mb(1048576), 1.0);
/// assert_eq!(bytes_to_mb(524288), 0.5);
/// ```
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

/// Calculate throughput in MB/s from bytes and duration
///
/// A zero duration yields `0.0` rather than an infinite or NaN rate.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use filebench::util::units::calculate_throughput_mbps;
///
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1));
/// assert!((throughput - 1.0).abs() < 0.01);
/// assert_eq!(calculate_throughput_mbps(1048576, Duration::ZERO), 0.0);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    bytes_to_mb(bytes) / duration.as_secs_f64()
}

/// Format bytes into human-readable size with appropriate units
///
/// # Examples
/// ```
/// use filebench::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a wall-clock duration at millisecond precision
pub fn format_elapsed(duration: Duration) -> String {
    let truncated = Duration::from_millis(duration.as_millis() as u64);
    if truncated.is_zero() {
        return "0ms".to_string();
    }
    humantime::format_duration(truncated).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb_to_bytes() {
        assert_eq!(mb_to_bytes(0), Some(0));
        assert_eq!(mb_to_bytes(10), Some(10 * 1048576));
        assert_eq!(mb_to_bytes(u64::MAX), None);
    }

    #[test]
    fn test_calculate_throughput_mbps() {
        let throughput = calculate_throughput_mbps(2097152, Duration::from_secs(2));
        assert!((throughput - 1.0).abs() < 0.01);

        let throughput = calculate_throughput_mbps(10 * 1048576, Duration::from_millis(500));
        assert!((throughput - 20.0).abs() < 0.01);

        assert_eq!(calculate_throughput_mbps(1000, Duration::ZERO), 0.0);
        assert_eq!(calculate_throughput_mbps(0, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_throughput_is_finite_for_tiny_durations() {
        let throughput = calculate_throughput_mbps(u64::MAX, Duration::from_nanos(1));
        assert!(throughput.is_finite());
        assert!(throughput > 0.0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(1073741824), "1.0 GiB");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0ms");
        assert_eq!(format_elapsed(Duration::from_micros(10)), "0ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1s 500ms");
        assert_eq!(format_elapsed(Duration::from_secs(90)), "1m 30s");
    }
}
