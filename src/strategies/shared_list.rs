// SPDX-License-Identifier: MIT

use super::{local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::{HarnessError, Result};
use crate::partition::Partitioner;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::thread;

/// Hands each spawned thread a borrowed view of its partition of the
/// dynamic array instead of a copy.
///
/// Views are disjoint and read-only, so the threads share the list without
/// locking. Scoped threads guarantee the list outlives every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedList;

impl SumStrategy for SharedList {
    fn name(&self) -> &'static str {
        "shared_list"
    }

    fn total(&self, dataset: &Dataset, workers: usize) -> Result<u64> {
        let list = dataset.list();
        let partitioner = Partitioner::new(list.len(), workers)?;

        let mut views: Vec<&[u32]> = Vec::new();
        views.try_reserve_exact(workers)?;
        views.extend(partitioner.map(|partition| &list[partition.range()]));

        let total = AtomicU64::new(0);
        thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::with_capacity(views.len());
            for view in views {
                let total = &total;
                // Threads spawned before a failure are joined when the
                // scope ends.
                handles.push(thread::Builder::new().spawn_scoped(
                    scope,
                    move || {
                        total.fetch_add(local_sum(view), SeqCst);
                    },
                )?);
            }

            // Join every worker before reading the shared total.
            let mut outcome = Ok(());
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && outcome.is_ok() {
                    outcome = Err(HarnessError::WorkerPanicked {
                        strategy: self.name(),
                        worker,
                    });
                }
            }
            outcome
        })?;

        Ok(total.load(SeqCst))
    }
}
