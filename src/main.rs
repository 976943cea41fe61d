// src/main.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for rowgen
//!
//! ```bash
//! # 50M rows in 1M-row batches on 4 workers -> 50000000_rows.csv
//! rowgen
//!
//! # Small reproducible file
//! rowgen --rows 10000 --batch-size 1000 --workers 8 --seed 42 -o sample.csv
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rowgen::constants::{DEFAULT_BATCH_SIZE, DEFAULT_ROW_COUNT, DEFAULT_WORKERS};
use rowgen::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "rowgen", version, about = "Generate a large CSV of synthetic event rows")]
struct Cli {
    /// Total data rows to write (must be a multiple of --batch-size)
    #[arg(long, short = 'r', env = "ROWGEN_ROWS", default_value_t = DEFAULT_ROW_COUNT)]
    rows: u64,

    /// Rows generated per batch
    #[arg(long, short = 'b', env = "ROWGEN_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Number of generation workers
    #[arg(long, short = 'w', env = "ROWGEN_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Batches that may wait for the writer (defaults to the worker count)
    #[arg(long, env = "ROWGEN_CAPACITY")]
    capacity: Option<usize>,

    /// Base seed; fixes the contents of every batch
    #[arg(long, env = "ROWGEN_SEED")]
    seed: Option<u64>,

    /// Output path (defaults to <rows>_rows.csv)
    #[arg(long, short = 'o', env = "ROWGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Suppress per-batch progress lines
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        Self {
            row_count: cli.rows,
            batch_size: cli.batch_size,
            workers: cli.workers,
            channel_capacity: cli.capacity,
            seed: cli.seed,
            output: cli.output,
            report_progress: !cli.quiet,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = PipelineConfig::from(Cli::parse());

    let path = config.output_path();
    let summary = rowgen::run(&config)
        .with_context(|| format!("Failed to generate {}", path.display()))?;

    if config.report_progress {
        println!(
            "{} rows, {} bytes in {:.2}s ({:.0} rows/sec)",
            summary.rows_written,
            summary.file_size_bytes.unwrap_or(0),
            summary.total_duration.as_secs_f64(),
            summary.rows_per_second()
        );
    }

    Ok(())
}
