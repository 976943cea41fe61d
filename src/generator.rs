// src/generator.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch generation and the per-worker production loop
//!
//! Batches are assigned to workers round-robin: worker `w` of `n` owns batch
//! indices `w, w + n, w + 2n, ...`. Each batch gets its own Xoshiro256++
//! instance seeded from `seed_base + batch_index`, so no RNG is ever shared
//! between threads.

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::record::Record;

/// A run of records generated together, tagged with its assignment index
#[derive(Debug, Clone)]
pub struct Batch {
    /// Assignment index in `[0, num_batches)`, not arrival order
    pub index: u64,
    pub records: Vec<Record>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Immutable description of how a run is split into batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub num_batches: u64,
    pub batch_size: usize,
    pub workers: usize,
}

impl BatchPlan {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            num_batches: config.num_batches(),
            batch_size: config.batch_size,
            workers: config.workers.max(1),
        }
    }

    /// Batch indices owned by `worker` (round-robin by worker index)
    pub fn assigned(&self, worker: usize) -> impl Iterator<Item = u64> {
        (worker as u64..self.num_batches).step_by(self.workers)
    }

    pub fn total_rows(&self) -> u64 {
        self.num_batches * self.batch_size as u64
    }
}

/// Seed for one batch. Distinct batch indices give distinct seeds for a given base.
pub fn batch_seed(seed_base: u64, index: u64) -> u64 {
    seed_base.wrapping_add(index)
}

/// Generate one batch of `batch_size` records
///
/// `now` anchors the temporal fields; the producer samples it once per batch.
pub fn generate_batch(index: u64, batch_size: usize, seed: u64, now: DateTime<Utc>) -> Batch {
    tracing::trace!("generate_batch: index={}, seed={}, size={}", index, seed, batch_size);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let records = (0..batch_size)
        .map(|_| Record::generate(&mut rng, now))
        .collect();

    Batch { index, records }
}

/// Run one worker to completion: generate and submit every batch it owns
///
/// Blocks on `tx` while the queue is full. Returns the number of batches
/// submitted. If the writer has gone away the worker stops with
/// [`PipelineError::WriterDisconnected`] instead of skipping batches.
pub fn produce(worker: usize, plan: &BatchPlan, seed_base: u64, tx: &Sender<Batch>) -> Result<u64> {
    let mut submitted = 0u64;

    for index in plan.assigned(worker) {
        let batch = generate_batch(
            index,
            plan.batch_size,
            batch_seed(seed_base, index),
            Utc::now(),
        );

        tx.send(batch)
            .map_err(|_| PipelineError::WriterDisconnected { batch: index })?;
        submitted += 1;

        tracing::debug!("worker {} submitted batch {}", worker, index);
    }

    tracing::debug!("worker {} finished after {} batches", worker, submitted);
    Ok(submitted)
}

/// Generate per-run entropy from time + urandom
pub fn generate_call_entropy() -> u64 {
    let time_entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let urandom_entropy: u64 = {
        let mut rng = rand::rng();
        rng.next_u64()
    };

    time_entropy.wrapping_add(urandom_entropy)
}
