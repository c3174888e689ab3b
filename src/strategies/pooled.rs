// SPDX-License-Identifier: MIT

use super::{local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::{HarnessError, Result};
use crate::partition::{Partition, Partitioner};
use crate::pools::{CompletionLatch, StandardPool, Task};
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;
use std::thread;

/// Task summing one partition of the shared array on a pool worker.
struct PartitionSumTask {
    /// Shared input array.
    array: Arc<[u32]>,
    /// Range of the array this task covers.
    partition: Partition,
    /// Shared total for the invocation.
    total: Arc<AtomicU64>,
    /// Counted down once this task has contributed.
    latch: Arc<CompletionLatch>,
}

/// Counts the latch down when dropped, so a panicking task still releases
/// the caller. A drop during unwinding also records the panic.
struct CountDownOnDrop<'a> {
    latch: &'a CompletionLatch,
    worker: usize,
}

impl Drop for CountDownOnDrop<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.latch.record_panic(self.worker);
        }
        self.latch.count_down();
    }
}

impl Task for PartitionSumTask {
    fn execute(&self) {
        let _count_down = CountDownOnDrop {
            latch: &self.latch,
            worker: self.partition.index,
        };
        let sum = local_sum(&self.array[self.partition.range()]);
        self.total.fetch_add(sum, SeqCst);
    }
}

/// Submits one task per worker to a pool of long-lived threads created up
/// front, then waits on a latch instead of joining threads.
///
/// The pool is reused by every invocation and shut down when the strategy is
/// dropped. Invocations from several callers may be in flight at once; each
/// owns its own total and latch.
pub struct PooledSharedArray {
    pool: StandardPool,
}

impl PooledSharedArray {
    /// Creates the strategy with a pool of `pool_threads` workers.
    pub fn new(pool_threads: usize) -> Self {
        PooledSharedArray {
            pool: StandardPool::new(pool_threads.max(1)),
        }
    }

    pub fn pool_threads(&self) -> usize {
        self.pool.thread_count()
    }

    /// Waits for the invocation's tasks and reads the total, failing if any
    /// task panicked.
    fn finish(&self, latch: &CompletionLatch, total: &AtomicU64) -> Result<u64> {
        // The total is only complete once every task has counted down.
        latch.wait();
        if let Some(worker) = latch.panicked_worker() {
            return Err(HarnessError::WorkerPanicked {
                strategy: self.name(),
                worker,
            });
        }
        Ok(total.load(SeqCst))
    }
}

impl SumStrategy for PooledSharedArray {
    fn name(&self) -> &'static str {
        "pooled_shared_array"
    }

    fn total(&self, dataset: &Dataset, workers: usize) -> Result<u64> {
        let partitioner = Partitioner::new(dataset.len(), workers)?;
        let total = Arc::new(AtomicU64::new(0));
        let latch = Arc::new(CompletionLatch::new(workers));

        for partition in partitioner {
            self.pool.add_task(Arc::new(PartitionSumTask {
                array: dataset.array().clone(),
                partition,
                total: total.clone(),
                latch: latch.clone(),
            }));
        }

        self.finish(&latch, &total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reused_across_invocations() {
        let dataset = Dataset::with_seed(100_003, 10, 11).unwrap();
        let strategy = PooledSharedArray::new(4);

        for workers in [1, 3, 4, 9] {
            for _ in 0..10 {
                assert_eq!(
                    strategy.total(&dataset, workers).unwrap(),
                    dataset.reference_total()
                );
            }
        }
        assert_eq!(strategy.pool_threads(), 4);
    }

    #[test]
    fn test_concurrent_submitters() {
        let dataset = Dataset::with_seed(50_000, 10, 5).unwrap();
        let strategy = PooledSharedArray::new(3);

        std::thread::scope(|scope| {
            for workers in 1..=6 {
                let strategy = &strategy;
                let dataset = &dataset;
                scope.spawn(move || {
                    for _ in 0..20 {
                        assert_eq!(
                            strategy.total(dataset, workers).unwrap(),
                            dataset.reference_total()
                        );
                    }
                });
            }
        });
    }

    #[test]
    fn test_panicking_task_reported() {
        let dataset = Dataset::from_values(vec![1, 2, 3, 4, 5]).unwrap();
        let strategy = PooledSharedArray::new(2);
        let total = Arc::new(AtomicU64::new(0));
        let latch = Arc::new(CompletionLatch::new(2));

        // Worker 1's range runs past the end of the array.
        let partitions = [
            Partition { index: 0, start: 0, end: 2 },
            Partition { index: 1, start: 2, end: 50 },
        ];
        for partition in partitions {
            strategy.pool.add_task(Arc::new(PartitionSumTask {
                array: dataset.array().clone(),
                partition,
                total: total.clone(),
                latch: latch.clone(),
            }));
        }

        assert!(matches!(
            strategy.finish(&latch, &total),
            Err(HarnessError::WorkerPanicked {
                strategy: "pooled_shared_array",
                worker: 1,
            })
        ));

        // The pool still serves later invocations.
        assert_eq!(strategy.total(&dataset, 2).unwrap(), 15);
    }
}
