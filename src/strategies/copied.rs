// SPDX-License-Identifier: MIT

use super::{join_workers, local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::partition::Partitioner;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;
use std::thread;

/// Copies each partition into its own buffer, then spawns one thread per
/// buffer.
///
/// The copy is repeated on every call, so its cost grows with the dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopiedChunks;

impl SumStrategy for CopiedChunks {
    fn name(&self) -> &'static str {
        "copied_chunks"
    }

    fn total(&self, dataset: &Dataset, workers: usize) -> Result<u64> {
        let array = dataset.array();
        let partitioner = Partitioner::new(array.len(), workers)?;

        // Physically copy every chunk before any worker starts.
        let mut chunks = Vec::new();
        chunks.try_reserve_exact(workers)?;
        for partition in partitioner {
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(partition.len())?;
            chunk.extend_from_slice(&array[partition.range()]);
            chunks.push(chunk);
        }

        let mut handles = Vec::new();
        handles.try_reserve_exact(workers)?;

        let total = Arc::new(AtomicU64::new(0));
        for chunk in chunks {
            let total = total.clone();
            let spawned = thread::Builder::new().spawn(move || {
                let sum = local_sum(&chunk);
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
