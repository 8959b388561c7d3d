//! Benchmark result data models
//!
//! Contains the per-phase statistics, per-file error records and the final
//! per-worker report produced by a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use crate::util::units::{bytes_to_mb, calculate_throughput_mbps};

/// Benchmark phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Write,
    Read,
}

/// Statistics collected for one phase of one worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    /// Files (write) or directory entries (read) processed so far
    pub files_attempted: u64,
    /// Files that completed without error
    pub files_succeeded: u64,
    /// Bytes actually transferred
    pub bytes: u64,
    /// Bytes the phase expected to transfer (payload size or stat size)
    pub bytes_expected: u64,
    /// Elapsed wall-clock time of the phase
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl PhaseStats {
    /// Megabytes transferred
    pub fn megabytes(&self) -> f64 {
        bytes_to_mb(self.bytes)
    }

    /// Throughput in MB/s, zero when no time has elapsed
    pub fn throughput_mbps(&self) -> f64 {
        calculate_throughput_mbps(self.bytes, self.elapsed)
    }

    /// Files that failed
    pub fn files_failed(&self) -> u64 {
        self.files_attempted - self.files_succeeded
    }
}

/// File operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOp {
    Write,
    Open,
    Stat,
    Read,
    /// File ended before its stat-reported length
    ShortRead,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileOp::Write => "write",
            FileOp::Open => "open",
            FileOp::Stat => "stat",
            FileOp::Read => "read",
            FileOp::ShortRead => "short read",
        };
        f.write_str(name)
    }
}

/// A single per-file failure, kept instead of aborting the phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub path: PathBuf,
    pub op: FileOp,
    pub reason: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed for {}: {}", self.op, self.path.display(), self.reason)
    }
}

/// Final report of one worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerReport {
    /// When the worker finished
    pub timestamp: DateTime<Utc>,
    pub worker_id: usize,
    pub directory: PathBuf,
    /// Label used in progress lines
    pub label: String,
    pub write: PhaseStats,
    pub read: PhaseStats,
    /// Per-file failures from both phases, in occurrence order
    pub errors: Vec<FileError>,
}

impl WorkerReport {
    /// Total files attempted across both phases
    pub fn files_attempted(&self) -> u64 {
        self.write.files_attempted + self.read.files_attempted
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line summary for the end of a run
    pub fn summary(&self) -> String {
        format!(
            "{} - wrote {}/{} files at {:.3} MB/s, read {} entries at {:.3} MB/s, {} errors",
            self.label,
            self.write.files_succeeded,
            self.write.files_attempted,
            self.write.throughput_mbps(),
            self.read.files_attempted,
            self.read.throughput_mbps(),
            self.errors.len()
        )
    }
}

// Durations as fractional seconds, matching the report lines
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_report() -> WorkerReport {
        WorkerReport {
            timestamp: Utc::now(),
            worker_id: 1,
            directory: PathBuf::from("/data"),
            label: "/data".to_string(),
            write: PhaseStats {
                files_attempted: 10,
                files_succeeded: 9,
                bytes: 9 * 1048576,
                bytes_expected: 10 * 1048576,
                elapsed: Duration::from_secs(3),
            },
            read: PhaseStats {
                files_attempted: 9,
                files_succeeded: 9,
                bytes: 9 * 1048576,
                bytes_expected: 9 * 1048576,
                elapsed: Duration::from_millis(1500),
            },
            errors: vec![FileError {
                path: PathBuf::from("/data/file_000004.dat"),
                op: FileOp::Write,
                reason: "No space left on device".to_string(),
            }],
        }
    }

    #[test]
    fn test_phase_stats_throughput() {
        let report = create_test_report();
        assert!((report.write.throughput_mbps() - 3.0).abs() < 1e-9);
        assert!((report.read.throughput_mbps() - 6.0).abs() < 1e-9);
        assert_eq!(report.write.megabytes(), 9.0);
        assert_eq!(report.write.files_failed(), 1);
    }

    #[test]
    fn test_empty_phase_reports_zero() {
        let stats = PhaseStats::default();
        assert_eq!(stats.throughput_mbps(), 0.0);
        assert_eq!(stats.files_failed(), 0);
    }

    #[test]
    fn test_summary_and_error_display() {
        let report = create_test_report();
        let summary = report.summary();
        assert!(summary.contains("wrote 9/10 files"));
        assert!(summary.contains("1 errors"));
        assert!(report.has_errors());
        assert_eq!(report.files_attempted(), 19);

        assert_eq!(
            report.errors[0].to_string(),
            "write failed for /data/file_000004.dat: No space left on device"
        );
        assert_eq!(FileOp::ShortRead.to_string(), "short read");
    }

    #[test]
    fn test_json_shape() {
        let report = create_test_report();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["worker_id"], 1);
        assert_eq!(value["write"]["elapsed"], 3.0);
        assert_eq!(value["read"]["elapsed"], 1.5);
        assert_eq!(value["errors"][0]["op"], "write");

        let back: WorkerReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.write, report.write);
        assert_eq!(back.errors, report.errors);
    }
}
