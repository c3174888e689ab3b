// SPDX-License-Identifier: MIT

use crate::error::{HarnessError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::LinkedList;
use std::sync::Arc;

/// Number of elements in the default dataset.
pub const DEFAULT_SIZE: usize = 1_000_000;

/// Values are drawn from `[0, DEFAULT_VALUE_BOUND)` by default.
pub const DEFAULT_VALUE_BOUND: u32 = 10;

/// An immutable dataset of small integers held in three value-equal
/// representations, together with the total of all its elements.
///
/// `array()[i] == list()[i] == linked().iter().nth(i)` for every `i`.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Contiguous fixed-size array, shared cheaply with spawned workers.
    array: Arc<[u32]>,
    /// Growable dynamic array.
    list: Vec<u32>,
    /// Node-per-element linked sequence.
    linked: LinkedList<u32>,
    /// Sum of all elements, computed by one sequential pass.
    reference_total: u64,
}

impl Dataset {
    /// Generates `size` values uniformly drawn from `[0, value_bound)`.
    ///
    /// # Errors
    /// [`HarnessError::InvalidValueBound`] if `value_bound` is 0, and
    /// [`HarnessError::Allocation`] if the backing storage cannot be
    /// reserved.
    pub fn generate<R: Rng + ?Sized>(
        size: usize,
        value_bound: u32,
        rng: &mut R,
    ) -> Result<Self> {
        if value_bound == 0 {
            return Err(HarnessError::InvalidValueBound);
        }

        let mut values = Vec::new();
        values.try_reserve_exact(size)?;
        values.extend((0..size).map(|_| rng.gen_range(0..value_bound)));

        let dataset = Self::from_values(values)?;
        tracing::debug!(
            size,
            value_bound,
            reference_total = dataset.reference_total,
            "generated dataset"
        );
        Ok(dataset)
    }

    /// Generates a reproducible dataset from a fixed seed.
    pub fn with_seed(size: usize, value_bound: u32, seed: u64) -> Result<Self> {
        Self::generate(size, value_bound, &mut StdRng::seed_from_u64(seed))
    }

    /// Generates a dataset from an entropy-seeded generator, so every run
    /// sees different values.
    pub fn random(size: usize, value_bound: u32) -> Result<Self> {
        Self::generate(size, value_bound, &mut StdRng::from_entropy())
    }

    /// Builds a dataset around known values.
    pub fn from_values(values: Vec<u32>) -> Result<Self> {
        let mut array = Vec::new();
        array.try_reserve_exact(values.len())?;
        array.extend_from_slice(&values);

        let linked: LinkedList<u32> = values.iter().copied().collect();

        let mut reference_total = 0u64;
        for &value in &array {
            reference_total += u64::from(value);
        }

        Ok(Dataset {
            array: Arc::from(array),
            list: values,
            linked,
            reference_total,
        })
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn array(&self) -> &Arc<[u32]> {
        &self.array
    }

    pub fn list(&self) -> &[u32] {
        &self.list
    }

    pub fn linked(&self) -> &LinkedList<u32> {
        &self.linked
    }

    /// The ground-truth sum every strategy is checked against.
    pub fn reference_total(&self) -> u64 {
        self.reference_total
    }

    /// Checks that all three representations hold the same values in the
    /// same order.
    pub fn representations_agree(&self) -> bool {
        self.array.len() == self.list.len()
            && self.list.len() == self.linked.len()
            && self.array.iter().eq(self.list.iter())
            && self.list.iter().eq(self.linked.iter())
    }
}
