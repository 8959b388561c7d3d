//! Benchmark driver
//!
//! Fans a configuration out into one blocking worker per assignment,
//! waits for all of them, and hands back their reports in worker order.

use std::sync::Arc;
use std::time::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinSet;
use tracing::{debug, info};
use crate::bench::worker::Benchmark;
use crate::config::{BenchmarkConfig, SeedPolicy};
use crate::io::disk::DiskIO;
use crate::models::WorkerReport;
use crate::report::ProgressSink;
use crate::util::units::format_elapsed;
use crate::{FileBenchError, Result};

/// Runs every worker of a configuration concurrently
pub struct Driver {
    config: BenchmarkConfig,
}

impl Driver {
    /// Create a new driver; the configuration is validated here
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Random source for one worker
    pub fn worker_rng(&self, worker_id: usize) -> StdRng {
        match self.config.seed {
            SeedPolicy::Entropy => StdRng::from_entropy(),
            SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker_id as u64)),
        }
    }

    /// Start all workers and wait for every one of them
    ///
    /// The first fatal worker error is returned as soon as it is observed;
    /// workers still running are left behind for the caller to abort.
    pub async fn run(
        &self,
        disk: Arc<dyn DiskIO>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Vec<WorkerReport>> {
        let start = Instant::now();
        let file_size = usize::try_from(self.config.file_size_bytes()).map_err(|_| {
            FileBenchError::ConfigError("File size does not fit in memory".to_string())
        })?;

        let mut workers = JoinSet::new();
        for assignment in self.config.assignments() {
            let worker_id = assignment.worker_id;
            let mut rng = self.worker_rng(worker_id);
            let bench = Benchmark::new(
                assignment,
                self.config.files_to_write,
                file_size,
                self.config.sync_writes,
            );
            let disk = Arc::clone(&disk);
            let sink = Arc::clone(&sink);

            debug!(worker = worker_id, "spawning worker for {}", bench.directory().display());
            workers.spawn_blocking(move || {
                let result = bench.run(disk.as_ref(), &mut rng, sink.as_ref());
                (worker_id, result)
            });
        }

        let mut reports = Vec::with_capacity(workers.len());
        while let Some(joined) = workers.join_next().await {
            let (worker_id, result) = joined
                .map_err(|e| FileBenchError::WorkerError(format!("Worker join failed: {}", e)))?;
            match &result {
                Ok(_) => debug!(worker = worker_id, "worker finished"),
                Err(e) => debug!(worker = worker_id, error = %e, "worker failed"),
            }
            reports.push(result?);
        }

        // Join order is completion order; report in configuration order
        reports.sort_by_key(|r| r.worker_id);
        info!("{} workers finished in {}", reports.len(), format_elapsed(start.elapsed()));
        Ok(reports)
    }
}
