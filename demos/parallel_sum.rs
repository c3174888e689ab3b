// SPDX-License-Identifier: MIT

use std::sync::Arc;
use sumbench::{BenchState, Dataset, HarnessConfig, WorkerCount};
use tracing_subscriber::EnvFilter;

fn main() -> sumbench::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = HarnessConfig::from_env()?;
    let dataset = Arc::new(match config.seed {
        Some(seed) => Dataset::with_seed(config.size, config.value_bound, seed)?,
        None => Dataset::random(config.size, config.value_bound)?,
    });
    println!(
        "Dataset: {} elements, reference total {}\n",
        dataset.len(),
        dataset.reference_total()
    );

    for &worker_count in &config.worker_counts {
        let state = BenchState::new(dataset.clone(), worker_count);
        let label = match worker_count {
            WorkerCount::Available => "available".to_string(),
            WorkerCount::Fixed(count) => count.to_string(),
        };
        println!("Workers: {} ({})", state.workers(), label);

        for strategy in state.strategies() {
            let throughput = state.measure(
                strategy,
                config.warmup_iterations,
                config.measurement_iterations,
            )?;
            println!(
                "  {:24} {:>12.1} ops/s  (mean {:?})",
                strategy.name(),
                throughput.ops_per_sec(),
                throughput.mean()
            );
        }
        println!();
    }

    Ok(())
}
