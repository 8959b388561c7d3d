//! Configuration management module
//!
//! Holds the benchmark parameters, turns them into per-worker assignments,
//! and loads an optional TOML base configuration.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::util::units::mb_to_bytes;
use crate::{FileBenchError, Result, FILE_EXTENSION, FILE_PREFIX, MAX_WORKERS_PER_DIRECTORY};

/// Benchmark configuration structure containing all test parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Target directories; each gets its own worker(s)
    pub directories: Vec<PathBuf>,
    /// Number of files each worker writes
    pub files_to_write: u64,
    /// Size of every written file, in MB
    pub file_size_mb: u64,
    /// How workers are assigned to directories
    pub assignment: AssignmentPolicy,
    /// Where each worker's random payload comes from
    pub seed: SeedPolicy,
    /// Whether to fsync each file after writing it
    pub sync_writes: bool,
}

/// Worker-to-directory assignment policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// One worker per configured directory
    PerDirectory,
    /// Several workers sharing each configured directory
    SharedDirectory {
        /// Worker count per directory
        workers: usize,
    },
}

/// Random source for worker payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Seed every worker's generator from OS entropy
    Entropy,
    /// Derive every worker's generator from a fixed seed plus its id
    Fixed(u64),
}

/// One unit of concurrent work produced from a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAssignment {
    /// Zero-based worker id, unique within a run
    pub worker_id: usize,
    /// Directory the worker writes into and reads back
    pub directory: PathBuf,
    /// Whether file names carry the worker id
    pub scoped_names: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            directories: vec![PathBuf::from(".")],
            files_to_write: 0,
            file_size_mb: 10,
            assignment: AssignmentPolicy::PerDirectory,
            seed: SeedPolicy::Entropy,
            sync_writes: false,
        }
    }
}

impl AssignmentPolicy {
    /// Build a policy from a reader/worker count; one worker keeps plain names.
    pub fn from_workers(workers: usize) -> Self {
        if workers == 1 {
            AssignmentPolicy::PerDirectory
        } else {
            AssignmentPolicy::SharedDirectory { workers }
        }
    }

    /// Workers started for each configured directory
    pub fn workers_per_directory(&self) -> usize {
        match self {
            AssignmentPolicy::PerDirectory => 1,
            AssignmentPolicy::SharedDirectory { workers } => *workers,
        }
    }
}

impl BenchmarkConfig {
    /// Create a new benchmark configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.directories.is_empty() {
            return Err(FileBenchError::ConfigError(
                "At least one directory is required".to_string()
            ));
        }

        if let Some(empty) = self.directories.iter().find(|d| d.as_os_str().is_empty()) {
            return Err(FileBenchError::ConfigError(
                format!("Empty directory path in {:?}", empty)
            ));
        }

        if self.file_size_mb == 0 {
            return Err(FileBenchError::ConfigError(
                "File size must be greater than 0".to_string()
            ));
        }

        // The payload lives in memory, so it has to fit a single allocation.
        let fits = mb_to_bytes(self.file_size_mb)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .is_some();
        if !fits {
            return Err(FileBenchError::ConfigError(
                format!("File size too large: {} MB", self.file_size_mb)
            ));
        }

        let workers = self.assignment.workers_per_directory();
        if workers == 0 {
            return Err(FileBenchError::ConfigError(
                "Worker count must be greater than 0".to_string()
            ));
        }

        if workers > MAX_WORKERS_PER_DIRECTORY {
            return Err(FileBenchError::ConfigError(
                format!("Too many workers: {} (max: {})",
                    workers, MAX_WORKERS_PER_DIRECTORY)
            ));
        }

        Ok(())
    }

    /// Payload size in bytes; only meaningful after [`validate`](Self::validate).
    pub fn file_size_bytes(&self) -> u64 {
        mb_to_bytes(self.file_size_mb).unwrap_or(u64::MAX)
    }

    /// Expand the configuration into worker assignments, ordered by id
    pub fn assignments(&self) -> Vec<WorkerAssignment> {
        let per_dir = self.assignment.workers_per_directory();
        let scoped_names = matches!(self.assignment, AssignmentPolicy::SharedDirectory { .. });

        self.directories
            .iter()
            .flat_map(|dir| std::iter::repeat(dir).take(per_dir))
            .enumerate()
            .map(|(worker_id, dir)| WorkerAssignment {
                worker_id,
                directory: dir.clone(),
                scoped_names,
            })
            .collect()
    }

    /// Set the target directories
    pub fn with_directories<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.directories = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of files per worker
    pub fn with_files(mut self, files: u64) -> Self {
        self.files_to_write = files;
        self
    }

    /// Set the file size in MB
    pub fn with_file_size_mb(mut self, size_mb: u64) -> Self {
        self.file_size_mb = size_mb;
        self
    }

    /// Set the assignment policy
    pub fn with_assignment(mut self, assignment: AssignmentPolicy) -> Self {
        self.assignment = assignment;
        self
    }

    /// Set the seed policy
    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether written files are synced to disk
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    /// Load a base configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FileBenchError::ConfigError(
                format!("Failed to read config file {}: {}", path.display(), e)
            ))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| FileBenchError::ConfigError(
                format!("Failed to parse config file {}: {}", path.display(), e)
            ))?;

        Ok(config)
    }
}

impl WorkerAssignment {
    /// File name for the 1-based `index`
    pub fn file_name(&self, index: u64) -> String {
        if self.scoped_names {
            format!("{}w{:03}_{:06}.{}", FILE_PREFIX, self.worker_id, index, FILE_EXTENSION)
        } else {
            format!("{}{:06}.{}", FILE_PREFIX, index, FILE_EXTENSION)
        }
    }

    /// Label used in progress lines
    pub fn label(&self) -> String {
        if self.scoped_names {
            format!("{} [worker {}]", self.directory.display(), self.worker_id)
        } else {
            self.directory.display().to_string()
        }
    }
}
