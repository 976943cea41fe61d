// src/error.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Errors that can stop a generation run. Every variant is fatal.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration rejected before any output was created.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Output sink could not be created, written or flushed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker could not hand off a batch because the writer is gone.
    #[error("writer stopped before batch {batch} could be delivered")]
    WriterDisconnected { batch: u64 },

    #[error("writer thread panicked")]
    WriterPanicked,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
