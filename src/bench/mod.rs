//! Benchmark engine module
//!
//! Contains the per-directory worker and the driver that runs workers
//! concurrently.

pub mod driver;
pub mod worker;

// Re-export commonly used types
pub use driver::Driver;
pub use worker::Benchmark;
