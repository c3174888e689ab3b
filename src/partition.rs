// SPDX-License-Identifier: MIT

use crate::error::{HarnessError, Result};
use std::ops::Range;

/// A contiguous range of dataset indices `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Index of the worker this partition belongs to.
    pub index: usize,
    /// First index covered by the partition.
    pub start: usize,
    /// One past the last index covered by the partition.
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `[0, total_items)` into one partition per worker.
///
/// Every partition but the last gets `total_items / workers` items; the last
/// one also takes the `total_items % workers` leftover items. Exactly
/// `workers` partitions are produced, so when there are fewer items than
/// workers the leading partitions are empty.
#[derive(Debug, Clone)]
pub struct Partitioner {
    /// Total number of items to be split.
    total_items: usize,
    /// Number of partitions to produce.
    workers: usize,
    /// Index of the next partition to yield.
    next_index: usize,
    /// Size of every partition except the last.
    base_size: usize,
    /// Leftover items appended to the last partition.
    remainder: usize,
}

impl Partitioner {
    /// Creates a partitioner dividing `total_items` among `workers`.
    ///
    /// # Errors
    /// Returns [`HarnessError::InvalidPartitionRequest`] when `workers` is 0.
    pub fn new(total_items: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(HarnessError::InvalidPartitionRequest { workers: 0 });
        }

        Ok(Partitioner {
            total_items,
            workers,
            next_index: 0,
            base_size: total_items / workers,
            remainder: total_items % workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn base_size(&self) -> usize {
        self.base_size
    }

    pub fn remainder(&self) -> usize {
        self.remainder
    }

    /// Returns the partition for worker `index` without iterating.
    ///
    /// Workers that only know their own index use this to compute their
    /// offsets into shared data.
    ///
    /// # Panics
    /// Panics if `index` is not below the worker count.
    pub fn partition_at(&self, index: usize) -> Partition {
        assert!(
            index < self.workers,
            "partition index {index} out of range for {} workers",
            self.workers
        );
        let start = index * self.base_size;
        let end = if index == self.workers - 1 {
            self.total_items
        } else {
            start + self.base_size
        };
        Partition { index, start, end }
    }
}

impl Iterator for Partitioner {
    type Item = Partition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index == self.workers {
            return None;
        }

        let partition = self.partition_at(self.next_index);
        self.next_index += 1;
        Some(partition)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.workers - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Partitioner {}
