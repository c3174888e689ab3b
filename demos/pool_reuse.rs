// SPDX-License-Identifier: MIT

use std::time::Instant;
use sumbench::strategies::{PooledSharedArray, SharedArray};
use sumbench::{verify_total, Dataset, SumStrategy};

/// Compares spawning fresh threads on every call against reusing a pool
/// created once up front.
fn main() -> sumbench::Result<()> {
    let dataset = Dataset::with_seed(1_000_000, 10, 2015)?;
    let workers = 4;
    let invocations = 200;

    println!("Creating pool with {} workers", workers);
    let pooled = PooledSharedArray::new(workers);
    let strategies: [&dyn SumStrategy; 2] = [&SharedArray, &pooled];

    for strategy in strategies {
        let start_time = Instant::now();
        for _ in 0..invocations {
            let total = strategy.total(&dataset, workers)?;
            verify_total(strategy.name(), total, dataset.reference_total())?;
        }
        println!(
            "{:20} {} invocations in {:.6} seconds",
            strategy.name(),
            invocations,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
