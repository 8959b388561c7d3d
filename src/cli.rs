//! CLI argument parsing for filebench

use std::path::PathBuf;
use clap::Parser;
use crate::config::{AssignmentPolicy, BenchmarkConfig, SeedPolicy};
use crate::report::Verbosity;
use crate::Result;

#[derive(Parser, Debug)]
#[command(name = crate::APP_NAME)]
#[command(version)]
#[command(
    about = "Write random files into directories, read them back, report MB/s",
    long_about = None
)]
pub struct Cli {
    /// Comma-separated directories to write into and read back [default: .]
    #[arg(long = "dir", value_name = "DIRS", value_delimiter = ',')]
    pub dirs: Vec<String>,

    /// Number of files each worker writes [default: 0]
    #[arg(long = "files", value_name = "COUNT")]
    pub files: Option<u64>,

    /// Size of every file in MB [default: 10]
    #[arg(long = "size", value_name = "MB")]
    pub size: Option<u64>,

    /// Workers per directory; more than one gives each worker its own file names [default: 1]
    #[arg(long = "readers", value_name = "N")]
    pub readers: Option<usize>,

    /// Fsync every file after writing it
    #[arg(long = "sync")]
    pub sync: bool,

    /// Seed payload generation for reproducible file contents
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Print the final reports as JSON after the log lines
    #[arg(long = "json")]
    pub json: bool,

    /// Base configuration file (TOML); command-line flags override it
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Build the benchmark configuration: config file first, then flags
    pub fn to_config(&self) -> Result<BenchmarkConfig> {
        let mut config = match &self.config {
            Some(path) => BenchmarkConfig::load(path)?,
            None => BenchmarkConfig::default(),
        };

        // "a,,b" and trailing commas leave empty segments behind
        let dirs: Vec<PathBuf> = self
            .dirs
            .iter()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .collect();
        if !dirs.is_empty() {
            config.directories = dirs;
        }
        if let Some(files) = self.files {
            config.files_to_write = files;
        }
        if let Some(size) = self.size {
            config.file_size_mb = size;
        }
        if let Some(readers) = self.readers {
            config.assignment = AssignmentPolicy::from_workers(readers);
        }
        if let Some(seed) = self.seed {
            config.seed = SeedPolicy::Fixed(seed);
        }
        if self.sync {
            config.sync_writes = true;
        }

        Ok(config)
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
