// src/lib.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent synthetic CSV generation for load testing
//!
//! This library provides:
//! - A record generator producing 20-column fake event rows from a seeded RNG
//! - A fixed pool of producer workers with round-robin batch assignment
//! - A bounded batch queue with backpressure
//! - A single writer that emits the header once and every batch in arrival order

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod record;
pub mod writer;

// Re-export main API
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use generator::{generate_batch, Batch, BatchPlan};
pub use pipeline::{run, run_to_writer, RunSummary};
pub use record::Record;
pub use writer::{BatchWriter, WriteSummary};
