// SPDX-License-Identifier: MIT

use crate::config::{HarnessConfig, WorkerCount};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::strategies::{
    CopiedChunks, DynamicArrayIter, LinkedListIter, ParallelDynamicArray,
    ParallelLinkedList, PooledSharedArray, Sequential, SharedArray, SharedList,
    SumStrategy,
};
use crate::verify::verify_total;
use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timing of repeated invocations of one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    /// Number of measured invocations.
    pub iterations: usize,
    /// Wall-clock time spent in the measured invocations.
    pub elapsed: Duration,
}

impl Throughput {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return f64::INFINITY;
        }
        self.iterations as f64 / secs
    }

    pub fn mean(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(iterations) => self.elapsed / iterations,
        }
    }
}

/// State shared by every invocation of a run: the immutable dataset, the
/// resolved worker count and the pooled strategy whose workers live as long
/// as the state does.
pub struct BenchState {
    dataset: Arc<Dataset>,
    workers: usize,
    pooled: PooledSharedArray,
}

impl BenchState {
    /// Wraps an existing dataset, sizing the pool to `workers`.
    pub fn new(dataset: Arc<Dataset>, workers: WorkerCount) -> Self {
        let workers = workers.resolve();
        tracing::info!(
            size = dataset.len(),
            workers,
            reference_total = dataset.reference_total(),
            "benchmark state ready"
        );
        BenchState {
            dataset,
            workers,
            pooled: PooledSharedArray::new(workers),
        }
    }

    /// Generates the dataset described by `config`.
    pub fn setup(config: &HarnessConfig, workers: WorkerCount) -> Result<Self> {
        let dataset = match config.seed {
            Some(seed) => {
                Dataset::with_seed(config.size, config.value_bound, seed)?
            }
            None => Dataset::random(config.size, config.value_bound)?,
        };
        Ok(Self::new(Arc::new(dataset), workers))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn pooled(&self) -> &PooledSharedArray {
        &self.pooled
    }

    /// Every strategy, in report order.
    pub fn strategies(&self) -> [&dyn SumStrategy; 9] {
        [
            &Sequential,
            &CopiedChunks,
            &SharedList,
            &SharedArray,
            &self.pooled,
            &LinkedListIter,
            &DynamicArrayIter,
            &ParallelLinkedList,
            &ParallelDynamicArray,
        ]
    }

    /// Invokes `strategy` once and verifies its total.
    pub fn run(&self, strategy: &dyn SumStrategy) -> Result<u64> {
        let total = strategy.total(&self.dataset, self.workers)?;
        verify_total(strategy.name(), total, self.dataset.reference_total())
    }

    /// Invokes and verifies every strategy once.
    pub fn run_all(&self) -> Result<Vec<(&'static str, u64)>> {
        self.strategies()
            .into_iter()
            .map(|strategy| Ok((strategy.name(), self.run(strategy)?)))
            .collect()
    }

    /// Runs `warmup` unmeasured and then `iterations` measured invocations,
    /// verifying each one.
    pub fn measure(
        &self,
        strategy: &dyn SumStrategy,
        warmup: usize,
        iterations: usize,
    ) -> Result<Throughput> {
        for _ in 0..warmup {
            black_box(self.run(strategy)?);
        }

        let start_time = Instant::now();
        for _ in 0..iterations {
            black_box(self.run(strategy)?);
        }
        let elapsed = start_time.elapsed();

        tracing::debug!(
            strategy = strategy.name(),
            workers = self.workers,
            iterations,
            ?elapsed,
            "measured strategy"
        );
        Ok(Throughput {
            iterations,
            elapsed,
        })
    }
}
