//! Utility functions module
//!
//! Contains helpers for size conversion and throughput math.

pub mod units;

// Re-export commonly used functions
pub use units::{
    bytes_to_mb, calculate_throughput_mbps, format_bytes, format_elapsed, mb_to_bytes,
    BYTES_PER_MB,
};
