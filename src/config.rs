// SPDX-License-Identifier: MIT

use crate::dataset::{DEFAULT_SIZE, DEFAULT_VALUE_BOUND};
use crate::error::{HarnessError, Result};
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

/// Worker-count parameter value meaning "one worker per logical processor".
pub const AVAILABLE_PROCESSORS: i64 = -1;

/// How many workers a strategy should split its input across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    /// As many workers as the host reports logical processors.
    Available,
    /// An explicit number of workers.
    Fixed(NonZeroUsize),
}

impl WorkerCount {
    /// Interprets a signed worker-count parameter.
    ///
    /// `-1` selects [`WorkerCount::Available`]; any other value must be
    /// positive.
    pub fn from_param(param: i64) -> Result<Self> {
        if param == AVAILABLE_PROCESSORS {
            return Ok(WorkerCount::Available);
        }

        usize::try_from(param)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(WorkerCount::Fixed)
            .ok_or(HarnessError::InvalidPartitionRequest { workers: param })
    }

    /// Resolves the count to a concrete number of workers.
    pub fn resolve(self) -> usize {
        match self {
            WorkerCount::Fixed(count) => count.get(),
            WorkerCount::Available => {
                thread::available_parallelism().map_or(1, NonZeroUsize::get)
            }
        }
    }
}

/// Parameters for one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of dataset elements.
    pub size: usize,
    /// Exclusive upper bound on generated values.
    pub value_bound: u32,
    /// Seed for a reproducible dataset; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Worker counts to sweep.
    pub worker_counts: Vec<WorkerCount>,
    /// Unmeasured iterations run before measuring.
    pub warmup_iterations: usize,
    /// Measured iterations.
    pub measurement_iterations: usize,
    /// Number of isolated processes the driver should fork; 0 runs in
    /// process.
    pub forks: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut worker_counts = vec![WorkerCount::Available];
        worker_counts.extend(
            (1..=8)
                .filter_map(NonZeroUsize::new)
                .map(WorkerCount::Fixed),
        );

        HarnessConfig {
            size: DEFAULT_SIZE,
            value_bound: DEFAULT_VALUE_BOUND,
            seed: None,
            worker_counts,
            warmup_iterations: 5,
            measurement_iterations: 5,
            forks: 0,
        }
    }
}

impl HarnessConfig {
    /// Defaults overlaid with any `SUMBENCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`, keyed by environment
    /// variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HarnessConfig::default();

        if let Some(size) = parse_var(&lookup, "SUMBENCH_SIZE")? {
            config.size = size;
        }
        if let Some(bound) = parse_var(&lookup, "SUMBENCH_VALUE_BOUND")? {
            config.value_bound = bound;
        }
        if let Some(seed) = parse_var(&lookup, "SUMBENCH_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(raw) = lookup("SUMBENCH_THREADS") {
            config.worker_counts = parse_worker_counts(&raw)?;
        }
        if let Some(warmup) = parse_var(&lookup, "SUMBENCH_WARMUP")? {
            config.warmup_iterations = warmup;
        }
        if let Some(iterations) = parse_var(&lookup, "SUMBENCH_MEASUREMENT")? {
            config.measurement_iterations = iterations;
        }
        if let Some(forks) = parse_var(&lookup, "SUMBENCH_FORKS")? {
            config.forks = forks;
        }

        if config.value_bound == 0 {
            return Err(HarnessError::InvalidValueBound);
        }
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HarnessError::Config { key, value: raw }),
    }
}

/// Parses a comma-separated list such as `-1,1,2,4`.
fn parse_worker_counts(raw: &str) -> Result<Vec<WorkerCount>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let param = item.parse::<i64>().map_err(|_| HarnessError::Config {
                key: "SUMBENCH_THREADS",
                value: raw.to_string(),
            })?;
            WorkerCount::from_param(param)
        })
        .collect()
}
