// SPDX-License-Identifier: MIT

//! Iterator reductions over the linked and dynamic-array representations.
//!
//! The parallel variants run on rayon's global pool and ignore the requested
//! worker count.

use super::{local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::Result;
use rayon::prelude::*;

/// Sequential iterator fold over the linked sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedListIter;

impl SumStrategy for LinkedListIter {
    fn name(&self) -> &'static str {
        "linked_list_iter"
    }

    fn total(&self, dataset: &Dataset, _workers: usize) -> Result<u64> {
        Ok(dataset.linked().iter().map(|&v| u64::from(v)).sum())
    }
}

/// Sequential iterator fold over the dynamic array.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicArrayIter;

impl SumStrategy for DynamicArrayIter {
    fn name(&self) -> &'static str {
        "dynamic_array_iter"
    }

    fn total(&self, dataset: &Dataset, _workers: usize) -> Result<u64> {
        Ok(local_sum(dataset.list()))
    }
}

/// Parallel reduction over the linked sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelLinkedList;

impl SumStrategy for ParallelLinkedList {
    fn name(&self) -> &'static str {
        "parallel_linked_list"
    }

    fn total(&self, dataset: &Dataset, _workers: usize) -> Result<u64> {
        Ok(dataset.linked().par_iter().map(|&v| u64::from(v)).sum())
    }
}

/// Parallel reduction over the dynamic array.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelDynamicArray;

impl SumStrategy for ParallelDynamicArray {
    fn name(&self) -> &'static str {
        "parallel_dynamic_array"
    }

    fn total(&self, dataset: &Dataset, _workers: usize) -> Result<u64> {
        Ok(dataset.list().par_iter().map(|&v| u64::from(v)).sum())
    }
}
