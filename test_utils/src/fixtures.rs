// SPDX-License-Identifier: MIT

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use sumbench::Dataset;

/// Worker counts used by the stress scenarios.
pub const STRESS_WORKER_COUNTS: [usize; 6] = [1, 2, 3, 4, 8, 16];

/// The five-element dataset `[1, 2, 3, 4, 5]`, totalling 15.
pub fn small_dataset() -> Dataset {
    Dataset::from_values(vec![1, 2, 3, 4, 5]).unwrap()
}

/// One million zeros.
pub fn zero_dataset() -> Dataset {
    Dataset::from_values(vec![0; 1_000_000]).unwrap()
}

/// A reproducible dataset with values in `[0, 10)`.
pub fn seeded_dataset(size: usize, seed: u64) -> Arc<Dataset> {
    Arc::new(Dataset::with_seed(size, 10, seed).unwrap())
}

/// A dataset whose size is drawn at random, so that it is rarely divisible
/// by the worker counts under test.
pub fn odd_sized_dataset(seed: u64) -> Arc<Dataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let size = rng.gen_range(10_000..20_000) | 1;
    Arc::new(Dataset::generate(size, 10, &mut rng).unwrap())
}
