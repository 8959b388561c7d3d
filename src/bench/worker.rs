//! Benchmark worker
//!
//! One `Benchmark` is one unit of concurrent work: it writes its files into
//! its directory, then reads back everything that directory contains. It
//! owns its payload, counters and error list; the disk, random source and
//! progress sink are handed in by the caller.

use std::path::PathBuf;
use std::time::Instant;
use chrono::Utc;
use rand::RngCore;
use tracing::{debug, warn};
use crate::config::WorkerAssignment;
use crate::io::disk::{DiskIO, EntryKind, ReadStep};
use crate::io::payload::Payload;
use crate::models::{FileError, FileOp, Phase, PhaseStats, WorkerReport};
use crate::report::{ProgressReport, ProgressSink};
use crate::util::units::format_bytes;
use crate::{FileBenchError, Result, CHECKPOINT_INTERVAL};

/// A single write-then-read benchmark instance
#[derive(Debug)]
pub struct Benchmark {
    assignment: WorkerAssignment,
    files_to_write: u64,
    file_size: usize,
    sync_writes: bool,
    payload: Option<Payload>,
    write: PhaseStats,
    read: PhaseStats,
    errors: Vec<FileError>,
}

impl Benchmark {
    /// Create a worker; `file_size` is in bytes
    pub fn new(
        assignment: WorkerAssignment,
        files_to_write: u64,
        file_size: usize,
        sync_writes: bool,
    ) -> Self {
        Self {
            assignment,
            files_to_write,
            file_size,
            sync_writes,
            payload: None,
            write: PhaseStats::default(),
            read: PhaseStats::default(),
            errors: Vec::new(),
        }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.assignment.directory
    }

    pub fn write_stats(&self) -> &PhaseStats {
        &self.write
    }

    pub fn read_stats(&self) -> &PhaseStats {
        &self.read
    }

    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    /// The payload, once the write phase has allocated it
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Make sure the target directory exists
    pub fn ensure_directory(&self, disk: &dyn DiskIO) -> Result<()> {
        disk.create_dir_all(self.directory()).map_err(|e| {
            FileBenchError::DirectoryCreate(format!("{}: {}", self.directory().display(), e))
        })
    }

    /// Write phase: `files_to_write` copies of one random payload
    pub fn generate_files<R: RngCore + ?Sized>(
        &mut self,
        disk: &dyn DiskIO,
        rng: &mut R,
        sink: &dyn ProgressSink,
    ) {
        let payload = self
            .payload
            .get_or_insert_with(|| Payload::random(self.file_size, rng));
        let file_len = payload.len() as u64;

        debug!(
            worker = self.assignment.worker_id,
            files = self.files_to_write,
            "starting write phase in {}: {} per file",
            self.assignment.directory.display(),
            format_bytes(file_len)
        );

        self.write = PhaseStats::default();
        let start = Instant::now();
        for index in 1..=self.files_to_write {
            let path = self.assignment.directory.join(self.assignment.file_name(index));
            self.write.files_attempted = index;
            self.write.bytes_expected += file_len;

            match disk.write_file(&path, payload.as_bytes(), self.sync_writes) {
                Ok(()) => {
                    self.write.files_succeeded += 1;
                    self.write.bytes += file_len;
                }
                Err(e) => {
                    warn!(
                        worker = self.assignment.worker_id,
                        "write failed for {}: {}",
                        path.display(),
                        e
                    );
                    self.errors.push(FileError {
                        path,
                        op: FileOp::Write,
                        reason: e.to_string(),
                    });
                }
            }

            if index % CHECKPOINT_INTERVAL == 0 {
                self.write.elapsed = start.elapsed();
                sink.report(&progress(&self.assignment, Phase::Write, &self.write, false));
            }
        }

        self.write.elapsed = start.elapsed();
        sink.report(&progress(&self.assignment, Phase::Write, &self.write, true));
    }

    /// Read phase: read back every regular file in the directory
    ///
    /// Directories and other non-file entries are skipped. An entry that
    /// cannot be stat'ed counts as an attempted file with a `Stat` error.
    /// The checkpoint cadence follows the listed entry index, skipped
    /// entries included. Fails only when the directory cannot be listed.
    pub fn read_back(&mut self, disk: &dyn DiskIO, sink: &dyn ProgressSink) -> Result<()> {
        let entries = disk.list_dir(self.directory()).map_err(|e| {
            FileBenchError::DirectoryList(format!("{}: {}", self.directory().display(), e))
        })?;

        self.read = PhaseStats::default();
        let mut buffer = Vec::new();
        let start = Instant::now();
        for (index, entry) in (1u64..).zip(entries) {
            match entry.kind {
                EntryKind::Other => {
                    debug!(
                        worker = self.assignment.worker_id,
                        "skipping non-file entry {}",
                        entry.path.display()
                    );
                }
                EntryKind::Unknown(reason) => {
                    self.read.files_attempted += 1;
                    self.record_failure(entry.path, FileOp::Stat, reason);
                }
                EntryKind::File => {
                    self.read.files_attempted += 1;
                    let outcome = disk.read_file(&entry.path, &mut buffer);
                    self.read.bytes += outcome.transferred;
                    self.read.bytes_expected += outcome.expected;

                    let short = outcome.is_short();
                    let failure = match outcome.error {
                        Some((step, e)) => Some((file_op(step), e.to_string())),
                        None if short => Some((
                            FileOp::ShortRead,
                            format!("read {} of {} bytes", outcome.transferred, outcome.expected),
                        )),
                        None => None,
                    };
                    match failure {
                        Some((op, reason)) => self.record_failure(entry.path, op, reason),
                        None => self.read.files_succeeded += 1,
                    }
                }
            }

            if index % CHECKPOINT_INTERVAL == 0 {
                self.read.elapsed = start.elapsed();
                sink.report(&progress(&self.assignment, Phase::Read, &self.read, false));
            }
        }

        self.read.elapsed = start.elapsed();
        sink.report(&progress(&self.assignment, Phase::Read, &self.read, true));
        Ok(())
    }

    fn record_failure(&mut self, path: PathBuf, op: FileOp, reason: String) {
        warn!(
            worker = self.assignment.worker_id,
            "{} failed for {}: {}",
            op,
            path.display(),
            reason
        );
        self.errors.push(FileError { path, op, reason });
    }

    /// Full run: ensure directory, write phase, read phase
    pub fn run<R: RngCore + ?Sized>(
        mut self,
        disk: &dyn DiskIO,
        rng: &mut R,
        sink: &dyn ProgressSink,
    ) -> Result<WorkerReport> {
        self.ensure_directory(disk)?;
        self.generate_files(disk, rng, sink);
        self.read_back(disk, sink)?;
        Ok(self.into_report())
    }

    /// Consume the worker into its final report
    pub fn into_report(self) -> WorkerReport {
        WorkerReport {
            timestamp: Utc::now(),
            worker_id: self.assignment.worker_id,
            label: self.assignment.label(),
            directory: self.assignment.directory,
            write: self.write,
            read: self.read,
            errors: self.errors,
        }
    }
}

fn file_op(step: ReadStep) -> FileOp {
    match step {
        ReadStep::Open => FileOp::Open,
        ReadStep::Stat => FileOp::Stat,
        ReadStep::Read => FileOp::Read,
    }
}

fn progress(
    assignment: &WorkerAssignment,
    phase: Phase,
    stats: &PhaseStats,
    is_final: bool,
) -> ProgressReport {
    ProgressReport {
        worker_id: assignment.worker_id,
        label: assignment.label(),
        phase,
        files: stats.files_attempted,
        bytes: stats.bytes,
        elapsed: stats.elapsed,
        is_final,
    }
}
