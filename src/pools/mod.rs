// SPDX-License-Identifier: MIT

mod latch;
pub mod standardpool;

pub use latch::CompletionLatch;
pub use standardpool::{StandardPool, Task};
