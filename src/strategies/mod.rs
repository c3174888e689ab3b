// SPDX-License-Identifier: MIT

//! Interchangeable ways of summing a [`Dataset`].
//!
//! Every concurrent strategy follows the same completion protocol: each
//! worker sums its partition into a local variable, adds that local sum into
//! a shared [`AtomicU64`](std::sync::atomic::AtomicU64) exactly once, and the
//! caller reads the shared total only after every worker has been joined or
//! has counted down the invocation's latch.

mod copied;
mod iterators;
mod pooled;
mod sequential;
mod shared_array;
mod shared_list;

pub use copied::CopiedChunks;
pub use iterators::{
    DynamicArrayIter, LinkedListIter, ParallelDynamicArray, ParallelLinkedList,
};
pub use pooled::PooledSharedArray;
pub use sequential::Sequential;
pub use shared_array::SharedArray;
pub use shared_list::SharedList;

use crate::dataset::Dataset;
use crate::error::{HarnessError, Result};
use std::thread::JoinHandle;

/// A summation strategy the benchmark driver can invoke repeatedly.
pub trait SumStrategy: Send + Sync {
    /// Stable name used in reports and error messages.
    fn name(&self) -> &'static str;

    /// Sums `dataset`, splitting the work across `workers` where the
    /// strategy is concurrent. Blocks until every worker has contributed.
    fn total(&self, dataset: &Dataset, workers: usize) -> Result<u64>;
}

/// Sums a run of values into a local 64-bit accumulator.
pub(crate) fn local_sum<'a, I>(values: I) -> u64
where
    I: IntoIterator<Item = &'a u32>,
{
    let mut sum = 0u64;
    for &value in values {
        sum += u64::from(value);
    }
    sum
}

/// Joins every handle, returning the first worker found to have panicked.
pub(crate) fn join_workers(
    strategy: &'static str,
    handles: Vec<JoinHandle<()>>,
) -> Result<()> {
    let mut outcome = Ok(());
    for (worker, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && outcome.is_ok() {
            outcome = Err(HarnessError::WorkerPanicked { strategy, worker });
        }
    }
    outcome
}

/// The standard set of strategies, with the pooled variant backed by a pool
/// of `pool_threads` workers.
pub fn all_strategies(pool_threads: usize) -> Vec<Box<dyn SumStrategy>> {
    vec![
        Box::new(Sequential),
        Box::new(CopiedChunks),
        Box::new(SharedList),
        Box::new(SharedArray),
        Box::new(PooledSharedArray::new(pool_threads)),
        Box::new(LinkedListIter),
        Box::new(DynamicArrayIter),
        Box::new(ParallelLinkedList),
        Box::new(ParallelDynamicArray),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let strategies = all_strategies(2);
        let mut names: Vec<_> = strategies.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), strategies.len());
    }

    #[test]
    fn test_every_strategy_sums_small_dataset() {
        let dataset = Dataset::from_values(vec![1, 2, 3, 4, 5]).unwrap();
        for strategy in all_strategies(2) {
            assert_eq!(
                strategy.total(&dataset, 2).unwrap(),
                15,
                "{}",
                strategy.name()
            );
        }
    }
}
