// SPDX-License-Identifier: MIT

use super::{local_sum, SumStrategy};
use crate::dataset::Dataset;
use crate::error::Result;

/// Single-threaded loop over the contiguous array. The baseline every other
/// strategy is compared with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl SumStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn total(&self, dataset: &Dataset, _workers: usize) -> Result<u64> {
        Ok(local_sum(dataset.array().iter()))
    }
}
