//! Progress reporting and logging setup
//!
//! Workers never log throughput directly; they hand a [`ProgressReport`] to
//! the [`ProgressSink`] they were given. The binary uses [`LogSink`], tests
//! can capture reports instead.

use std::io::IsTerminal;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use crate::models::{Phase, WorkerReport};
use crate::util::units::{bytes_to_mb, calculate_throughput_mbps};

/// Snapshot emitted at a checkpoint or at the end of a phase
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub worker_id: usize,
    pub label: String,
    pub phase: Phase,
    /// Files or entries processed so far
    pub files: u64,
    /// Bytes transferred so far
    pub bytes: u64,
    pub elapsed: Duration,
    /// True for the end-of-phase summary
    pub is_final: bool,
}

impl ProgressReport {
    pub fn megabytes(&self) -> f64 {
        bytes_to_mb(self.bytes)
    }

    pub fn throughput_mbps(&self) -> f64 {
        calculate_throughput_mbps(self.bytes, self.elapsed)
    }

    /// The "MB in seconds" line
    pub fn amount_line(&self) -> String {
        let verb = match self.phase {
            Phase::Write => "Wrote",
            Phase::Read => "Read",
        };
        format!(
            "{} - {}: {:6.3} MB in {:6.3} seconds",
            self.label,
            verb,
            self.megabytes(),
            self.elapsed.as_secs_f64()
        )
    }

    /// The "Speed is" line
    pub fn speed_line(&self) -> String {
        let verb = match self.phase {
            Phase::Write => "Write",
            Phase::Read => "Read",
        };
        format!("{} - {} Speed is: {:6.3} MB/s", self.label, verb, self.throughput_mbps())
    }
}

/// Destination for worker progress
pub trait ProgressSink: Send + Sync {
    fn report(&self, report: &ProgressReport);
}

/// Sink that writes report lines through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&self, report: &ProgressReport) {
        let (worker, final_report) = (report.worker_id, report.is_final);
        info!(worker, final_report, "{}", report.amount_line());
        info!(worker, final_report, "{}", report.speed_line());
    }
}

/// Sink that drops every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _report: &ProgressReport) {}
}

/// Final write and read summaries for a finished worker
pub fn final_reports(report: &WorkerReport) -> [ProgressReport; 2] {
    let make = |phase, stats: &crate::models::PhaseStats| ProgressReport {
        worker_id: report.worker_id,
        label: report.label.clone(),
        phase,
        files: stats.files_attempted,
        bytes: stats.bytes,
        elapsed: stats.elapsed,
        is_final: true,
    };
    [make(Phase::Write, &report.write), make(Phase::Read, &report.read)]
}

/// Print the end-of-run figures of every worker in turn
pub fn print_final_reports(reports: &[WorkerReport], sink: &dyn ProgressSink) {
    for report in reports {
        for summary in final_reports(report) {
            sink.report(&summary);
        }
        debug!(worker = report.worker_id, "{}", report.summary());

        if report.has_errors() {
            for error in &report.errors {
                warn!(worker = report.worker_id, "{} - {}", report.label, error);
            }
            warn!(
                worker = report.worker_id,
                "{} - {} of {} file operations failed",
                report.label,
                report.errors.len(),
                report.files_attempted()
            );
        }
    }
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Install the process-wide log subscriber writing to stdout
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhaseStats;
    use chrono::Utc;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<ProgressReport>>);

    impl ProgressSink for Capture {
        fn report(&self, report: &ProgressReport) {
            self.0.lock().unwrap().push(report.clone());
        }
    }

    fn sample(phase: Phase, bytes: u64, elapsed: Duration) -> ProgressReport {
        ProgressReport {
            worker_id: 0,
            label: "/tmp/a".to_string(),
            phase,
            files: 5,
            bytes,
            elapsed,
            is_final: false,
        }
    }

    #[test]
    fn test_write_lines() {
        let report = sample(Phase::Write, 5 * 1048576, Duration::from_millis(2500));
        assert_eq!(report.amount_line(), "/tmp/a - Wrote:  5.000 MB in  2.500 seconds");
        assert_eq!(report.speed_line(), "/tmp/a - Write Speed is:  2.000 MB/s");
    }

    #[test]
    fn test_read_lines_with_zero_elapsed() {
        let report = sample(Phase::Read, 1048576, Duration::ZERO);
        assert_eq!(report.amount_line(), "/tmp/a - Read:  1.000 MB in  0.000 seconds");
        assert_eq!(report.speed_line(), "/tmp/a - Read Speed is:  0.000 MB/s");
    }

    #[test]
    fn test_print_final_reports_emits_pair_per_worker() {
        let reports: Vec<_> = (0..3)
            .map(|id| WorkerReport {
                timestamp: Utc::now(),
                worker_id: id,
                directory: PathBuf::from(format!("d{}", id)),
                label: format!("d{}", id),
                write: PhaseStats { files_attempted: 2, bytes: 2048, ..Default::default() },
                read: PhaseStats::default(),
                errors: Vec::new(),
            })
            .collect();

        let capture = Capture::default();
        print_final_reports(&reports, &capture);

        let seen = capture.0.into_inner().unwrap();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|r| r.is_final));
        let phases: Vec<_> = seen.iter().map(|r| (r.worker_id, r.phase)).collect();
        assert_eq!(
            phases,
            [
                (0, Phase::Write), (0, Phase::Read),
                (1, Phase::Write), (1, Phase::Read),
                (2, Phase::Write), (2, Phase::Read),
            ]
        );
        assert_eq!(seen[0].bytes, 2048);
        assert_eq!(seen[0].files, 2);
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.default_directive(), "warn");
    }
}
