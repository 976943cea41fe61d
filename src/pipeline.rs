// src/pipeline.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent generation with a single ordered writer
//!
//! # Topology
//! ```text
//!   worker 0 ─┐
//!   worker 1 ─┼──> bounded queue (capacity = workers) ──> writer ──> sink
//!   worker N ─┘
//! ```
//!
//! Workers run on a dedicated rayon pool started with `broadcast`, so pool
//! thread `w` is worker `w` and owns batches `w, w + N, ...`. The writer runs on
//! its own scoped thread. Closing is two-phase: `broadcast` returns only once
//! every worker has submitted its last batch and dropped its sender clone, then
//! the coordinator drops the original sender, which ends the writer's loop after
//! it drains what is left.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::PipelineConfig;
use crate::constants::WRITE_BUFFER_SIZE;
use crate::error::{PipelineError, Result};
use crate::generator::{generate_call_entropy, produce, Batch, BatchPlan};
use crate::writer::BatchWriter;

/// Metrics from a completed run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Data rows written (header excluded)
    pub rows_written: u64,
    pub batches_written: u64,
    /// Size of the output file, when writing to a file
    pub file_size_bytes: Option<u64>,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Generate the configured rows into the configured output file
///
/// The file is created (truncated) before generation starts. On failure a
/// partially written file is left in place.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    // Checked here as well so an invalid config never creates the file
    config.validate()?;

    let path = config.output_path();
    tracing::info!("Writing {} rows to {}", config.row_count, path.display());

    let file = File::create(&path)?;
    let sink = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

    let (mut summary, sink) = run_to_writer(config, sink)?;

    let file = sink.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    summary.file_size_bytes = Some(file.metadata()?.len());
    drop(file);

    if config.report_progress {
        println!("Done writing rows");
    }

    tracing::info!(
        "CSV generation complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
        summary.rows_written,
        summary.file_size_bytes.unwrap_or(0),
        summary.total_duration,
        summary.rows_per_second()
    );

    Ok(summary)
}

/// Run the whole pipeline into an arbitrary sink and return it flushed
pub fn run_to_writer<W: Write + Send>(config: &PipelineConfig, sink: W) -> Result<(RunSummary, W)> {
    config.validate()?;
    let start = Instant::now();

    let plan = BatchPlan::from_config(config);
    let seed_base = config.seed.unwrap_or_else(generate_call_entropy);
    let capacity = config.capacity();

    let cpus = num_cpus::get();
    if plan.workers > cpus {
        tracing::warn!(
            "{} workers requested but only {} CPUs available",
            plan.workers,
            cpus
        );
    }

    tracing::info!(
        "Starting generation: rows={}, batches={}, batch_size={}, workers={}, capacity={}",
        plan.total_rows(),
        plan.num_batches,
        plan.batch_size,
        plan.workers,
        capacity
    );
    tracing::trace!("seed_base={}", seed_base);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(plan.workers)
        .thread_name(|i| format!("rowgen-worker-{i}"))
        .build()?;

    let (tx, rx) = crossbeam_channel::bounded::<Batch>(capacity);
    let writer = BatchWriter::new(sink, plan.num_batches, config.report_progress);

    let (written, sink) = thread::scope(|s| -> Result<_> {
        let writer_handle = thread::Builder::new()
            .name("rowgen-writer".to_string())
            .spawn_scoped(s, move || writer.drain(rx))?;

        // Phase 1: every worker runs to completion and drops its sender clone
        let produced: Vec<Result<u64>> = pool.broadcast(|ctx| {
            let tx = tx.clone();
            produce(ctx.index(), &plan, seed_base, &tx)
        });

        // Phase 2: close the queue so the writer stops after draining
        drop(tx);

        let written = writer_handle
            .join()
            .map_err(|_| PipelineError::WriterPanicked)?;

        // A writer failure explains any disconnect errors the workers saw
        let (summary, sink) = written?;

        let submitted = produced.into_iter().sum::<Result<u64>>()?;
        debug_assert_eq!(submitted, summary.batches_written);

        Ok((summary, sink))
    })?;

    let summary = RunSummary {
        rows_written: written.rows_written,
        batches_written: written.batches_written,
        file_size_bytes: None,
        total_duration: start.elapsed(),
    };

    tracing::info!(
        "Generation finished: {} batches, {} rows in {:?}",
        summary.batches_written,
        summary.rows_written,
        summary.total_duration
    );

    Ok((summary, sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        use tracing_subscriber::{fmt, EnvFilter};
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    fn quiet(row_count: u64, batch_size: usize, workers: usize) -> PipelineConfig {
        PipelineConfig {
            row_count,
            batch_size,
            workers,
            report_progress: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_to_writer_counts() {
        init_tracing();
        let (summary, buf) = run_to_writer(&quiet(40, 5, 3), Vec::new()).unwrap();
        assert_eq!(summary.batches_written, 8);
        assert_eq!(summary.rows_written, 40);
        assert_eq!(summary.file_size_bytes, None);
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 41);
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let err = run_to_writer(&quiet(12, 5, 2), Vec::new()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_run_with_progress_leaves_closed_complete_file() {
        init_tracing();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("progress.csv");
        let config = PipelineConfig {
            output: Some(path.clone()),
            report_progress: true,
            ..quiet(12, 4, 2)
        };

        let summary = run(&config).unwrap();

        // Completion is reported only after the file is synced and closed
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 13);
        assert_eq!(summary.file_size_bytes, Some(contents.len() as u64));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rows_per_second() {
        let summary = RunSummary {
            rows_written: 1000,
            total_duration: Duration::from_millis(500),
            ..Default::default()
        };
        assert!((summary.rows_per_second() - 2000.0).abs() < 1e-6);
        assert_eq!(RunSummary::default().rows_per_second(), 0.0);
    }
}
