// src/config.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use crate::constants::*;
use crate::error::{PipelineError, Result};

/// Configuration for a generation run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Total rows to write (excluding the header). Must be a multiple of `batch_size`.
    pub row_count: u64,
    /// Rows per batch
    pub batch_size: usize,
    /// Number of producer workers (threads in the generation pool)
    pub workers: usize,
    /// Bounded queue capacity in batches (None = one slot per worker)
    pub channel_capacity: Option<usize>,
    /// Base seed for batch RNGs (None = use time + urandom)
    /// When set, every batch index maps to identical records across runs,
    /// though batches may still land in the file in a different order
    pub seed: Option<u64>,
    /// Output file (None = `{row_count}_rows.csv` in the working directory)
    pub output: Option<PathBuf>,
    /// Print `Wrote batch X/Y` lines and the completion line on stdout
    pub report_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            channel_capacity: None, // One slot per worker
            seed: None,             // Use time + urandom
            output: None,           // {row_count}_rows.csv
            report_progress: true,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the partition scheme cannot honour
    ///
    /// A row count that is not a multiple of the batch size is an error rather
    /// than being truncated to whole batches.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == Some(0) {
            return Err(PipelineError::InvalidConfig(
                "channel capacity must be at least 1".to_string(),
            ));
        }
        if self.row_count % self.batch_size as u64 != 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "row count {} is not a multiple of batch size {}",
                self.row_count, self.batch_size
            )));
        }
        Ok(())
    }

    /// Number of batches in the run. Only meaningful after `validate()`.
    pub fn num_batches(&self) -> u64 {
        self.row_count / self.batch_size.max(1) as u64
    }

    pub fn capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(self.workers).max(1)
    }

    /// Path the run writes to
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_rows.csv", self.row_count)))
    }
}
