// SPDX-License-Identifier: MIT

//! Harness comparing strategies for summing a large, fixed dataset of small
//! integers: a sequential loop, threads spawned per call over copied or
//! shared data, and a reusable worker pool.
//!
//! Every strategy's result is checked against a reference total computed
//! once when the dataset is generated.

pub mod config;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod partition;
pub mod pools;
pub mod strategies;
pub mod verify;

pub use config::{HarnessConfig, WorkerCount};
pub use dataset::Dataset;
pub use error::{HarnessError, Result};
pub use harness::{BenchState, Throughput};
pub use partition::{Partition, Partitioner};
pub use pools::{CompletionLatch, StandardPool, Task};
pub use strategies::SumStrategy;
pub use verify::verify_total;
