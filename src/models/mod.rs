//! Data models module
//!
//! Contains phase statistics, per-file error records and worker reports.

pub mod result;

// Re-export commonly used types
pub use result::{
    FileError,
    FileOp,
    Phase,
    PhaseStats,
    WorkerReport,
};
