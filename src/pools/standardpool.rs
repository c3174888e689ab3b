// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

/// Trait defining a general task structure, with an execute method to be
/// implemented by each task.
pub trait Task {
    fn execute(&self);
}

/// Shared data structure for the pool, holding the task queue and a
/// shutdown flag.
struct PoolSharedData {
    /// Queue of tasks for worker threads.
    task_queue: VecDeque<Arc<dyn Task + Send + Sync>>,
    /// Flag to signal shutdown to worker threads.
    shutdown_flag: bool,
}

impl PoolSharedData {
    fn new() -> Self {
        PoolSharedData {
            task_queue: VecDeque::with_capacity(128),
            shutdown_flag: false,
        }
    }
}

/// Fixed pool of long-lived worker threads draining a shared task queue.
///
/// The pool is created once and reused across many submissions. Completion
/// of a batch is tracked by the submitter, typically with a
/// [`CompletionLatch`](super::CompletionLatch) shared by the batch's tasks.
pub struct StandardPool {
    /// Pool of worker threads.
    worker_threads: Vec<thread::JoinHandle<()>>,
    /// Shared data protected by a mutex.
    shared_data: Arc<Mutex<PoolSharedData>>,
    /// Condition variable to notify workers of new tasks or shutdown.
    task_available: Arc<Condvar>,
}

fn lock_shared(
    shared_data: &Mutex<PoolSharedData>,
) -> MutexGuard<'_, PoolSharedData> {
    match shared_data.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            shared_data.clear_poison();
            poisoned.into_inner()
        }
    }
}

impl StandardPool {
    /// Creates a new pool with the specified number of worker threads.
    pub fn new(thread_count: usize) -> Self {
        let mut pool = StandardPool {
            worker_threads: Vec::with_capacity(thread_count),
            shared_data: Arc::new(Mutex::new(PoolSharedData::new())),
            task_available: Arc::new(Condvar::new()),
        };

        // Spawn worker threads that wait for tasks to be added to the task
        // queue.
        for worker_id in 0..thread_count {
            let shared_data = pool.shared_data.clone();
            let task_condvar = pool.task_available.clone();
            pool.worker_threads.push(thread::spawn(move || {
                Self::worker_loop(worker_id, &shared_data, &task_condvar)
            }));
        }

        tracing::debug!(thread_count, "worker pool started");
        pool
    }

    fn worker_loop(
        worker_id: usize,
        shared_data: &Mutex<PoolSharedData>,
        task_condvar: &Condvar,
    ) {
        loop {
            let task = {
                let mut shared_data_guard = lock_shared(shared_data);

                // Wait until there is a task to process or a shutdown signal.
                while shared_data_guard.task_queue.is_empty()
                    && !shared_data_guard.shutdown_flag
                {
                    shared_data_guard = task_condvar
                        .wait(shared_data_guard)
                        .unwrap_or_else(|e| e.into_inner());
                }

                // Queued work is drained before honouring shutdown.
                match shared_data_guard.task_queue.pop_front() {
                    Some(task) => task,
                    None => break,
                }
            };

            // Execute the task outside the lock scope.
            if panic::catch_unwind(AssertUnwindSafe(|| task.execute())).is_err()
            {
                tracing::error!(worker_id, "pool task panicked");
            }
        }

        tracing::trace!(worker_id, "pool worker exiting");
    }

    /// Number of worker threads in the pool.
    pub fn thread_count(&self) -> usize {
        self.worker_threads.len()
    }

    /// Adds a task to the queue and notifies one waiting worker thread.
    pub fn add_task(&self, task: Arc<dyn Task + Send + Sync>) {
        let mut shared_data_guard = lock_shared(&self.shared_data);
        shared_data_guard.task_queue.push_back(task);
        self.task_available.notify_one();
    }
}

impl Drop for StandardPool {
    /// Signals the workers to shut down once the queue is drained, then joins
    /// them.
    fn drop(&mut self) {
        {
            let mut shared_data_guard = lock_shared(&self.shared_data);
            shared_data_guard.shutdown_flag = true;
            self.task_available.notify_all();
        }

        for handler in self.worker_threads.drain(..) {
            let _ = handler.join();
        }
        tracing::debug!("worker pool stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::CompletionLatch;
    use std::sync::atomic::{AtomicU64, Ordering::SeqCst};

    /// Task that adds one to a shared counter, then counts down a latch.
    struct IncrementTask {
        counter: Arc<AtomicU64>,
        latch: Arc<CompletionLatch>,
    }

    impl Task for IncrementTask {
        fn execute(&self) {
            self.counter.fetch_add(1, SeqCst);
            self.latch.count_down();
        }
    }

    struct PanickingTask {
        latch: Arc<CompletionLatch>,
    }

    impl Task for PanickingTask {
        fn execute(&self) {
            self.latch.count_down();
            panic!("task failure");
        }
    }

    #[test]
    fn test_batches_reuse_workers() {
        let num_workers = 8;
        let batch_size = 256;
        let pool = StandardPool::new(num_workers);
        let counter = Arc::new(AtomicU64::new(0));

        // Run tasks in 8 batches, waiting on a fresh latch for each.
        for batch in 1..=8u64 {
            let latch = Arc::new(CompletionLatch::new(batch_size));
            for _ in 0..batch_size {
                pool.add_task(Arc::new(IncrementTask {
                    counter: counter.clone(),
                    latch: latch.clone(),
                }));
            }
            latch.wait();
            assert_eq!(counter.load(SeqCst), batch * batch_size as u64);
        }

        assert_eq!(pool.thread_count(), num_workers);
    }

    #[test]
    fn test_worker_survives_panicking_task() {
        let pool = StandardPool::new(1);

        let latch = Arc::new(CompletionLatch::new(1));
        pool.add_task(Arc::new(PanickingTask {
            latch: latch.clone(),
        }));
        latch.wait();

        let counter = Arc::new(AtomicU64::new(0));
        let latch = Arc::new(CompletionLatch::new(1));
        pool.add_task(Arc::new(IncrementTask {
            counter: counter.clone(),
            latch: latch.clone(),
        }));
        latch.wait();

        assert_eq!(counter.load(SeqCst), 1);
    }

    #[test]
    fn test_drop_drains_queue() {
        let counter = Arc::new(AtomicU64::new(0));
        let latch = Arc::new(CompletionLatch::new(64));
        {
            let pool = StandardPool::new(2);
            for _ in 0..64 {
                pool.add_task(Arc::new(IncrementTask {
                    counter: counter.clone(),
                    latch: latch.clone(),
                }));
            }
        }

        assert_eq!(counter.load(SeqCst), 64);
        assert_eq!(latch.count(), 0);
    }
}
