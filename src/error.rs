// SPDX-License-Identifier: MIT

use std::collections::TryReserveError;
use std::io;

/// Errors raised while generating, partitioning, summing or verifying.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A worker count of zero or a negative count other than the
    /// "available processors" sentinel.
    #[error("invalid partition request: worker count {workers} must be positive")]
    InvalidPartitionRequest {
        /// The rejected worker count, as supplied.
        workers: i64,
    },

    /// A blocking completion wait returned before every worker finished.
    #[error("completion wait interrupted before all workers finished")]
    WaitInterrupted,

    /// A strategy produced a total that differs from the reference total.
    #[error("{strategy}: computed total {actual} differs from reference total {expected}")]
    CorrectnessViolation {
        /// Name of the offending strategy.
        strategy: &'static str,
        /// The reference total computed at generation time.
        expected: u64,
        /// The total the strategy returned.
        actual: u64,
    },

    /// An ephemeral worker thread panicked before contributing its sum.
    #[error("{strategy}: worker {worker} panicked")]
    WorkerPanicked {
        /// Name of the strategy that spawned the worker.
        strategy: &'static str,
        /// Index of the worker's partition.
        worker: usize,
    },

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    /// The dataset or per-worker bookkeeping could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Values must be drawn from a non-empty range.
    #[error("value bound must be greater than zero")]
    InvalidValueBound,

    /// A configuration value could not be parsed.
    #[error("invalid configuration value {value:?} for {key}")]
    Config {
        /// The environment variable being read.
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;
