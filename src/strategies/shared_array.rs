// SPDX-License-Identifier: MIT

use super::{join_workers, local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::partition::Partitioner;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;
use std::thread;

/// Spawns one thread per worker over the shared contiguous array. Each
/// thread knows only its worker index and computes its own offsets, so
/// nothing is copied or split up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedArray;

impl SumStrategy for SharedArray {
    fn name(&self) -> &'static str {
        "shared_array"
    }

    fn total(&self, dataset: &Dataset, workers: usize) -> Result<u64> {
        let partitioner = Partitioner::new(dataset.len(), workers)?;
        let total = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        handles.try_reserve_exact(workers)?;

        for worker in 0..workers {
            let array = dataset.array().clone();
            let partitioner = partitioner.clone();
            let total = total.clone();
            let spawned = thread::Builder::new().spawn(move || {
                let partition = partitioner.partition_at(worker);
                let sum = local_sum(&array[partition.range()]);
                total.fetch_add(sum, SeqCst);
            });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Let the workers already running finish first.
                    let _ = join_workers(self.name(), handles);
                    return Err(err.into());
                }
            }
        }

        // Join every worker before reading the shared total.
        join_workers(self.name(), handles)?;
        Ok(total.load(SeqCst))
    }
}
