// SPDX-License-Identifier: MIT

use crate::error::{HarnessError, Result};
use std::sync::{Condvar, Mutex, MutexGuard, OnceLock};

/// Counting barrier for one invocation's tasks.
///
/// Starts at the number of submitted tasks; each task counts down once when
/// it finishes. Waiters are released when the count reaches zero.
#[derive(Debug)]
pub struct CompletionLatch {
    /// Tasks still outstanding.
    remaining: Mutex<usize>,
    /// Signalled when `remaining` reaches zero.
    released: Condvar,
    /// First worker whose task panicked, if any.
    panicked_worker: OnceLock<usize>,
}

impl CompletionLatch {
    pub fn new(count: usize) -> Self {
        CompletionLatch {
            remaining: Mutex::new(count),
            released: Condvar::new(),
            panicked_worker: OnceLock::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        match self.remaining.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.remaining.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// Records one finished task, waking waiters on the last one.
    pub fn count_down(&self) {
        let mut remaining_guard = self.lock();
        if *remaining_guard == 0 {
            return;
        }

        *remaining_guard -= 1;
        if *remaining_guard == 0 {
            self.released.notify_all();
        }
    }

    /// Records that `worker`'s task panicked. Only the first report is kept.
    pub fn record_panic(&self, worker: usize) {
        let _ = self.panicked_worker.set(worker);
    }

    /// The first worker reported through [`record_panic`](Self::record_panic).
    pub fn panicked_worker(&self) -> Option<usize> {
        self.panicked_worker.get().copied()
    }

    /// Number of tasks that have not yet counted down.
    pub fn count(&self) -> usize {
        *self.lock()
    }

    /// Blocks once on the latch.
    ///
    /// Returns `Ok(())` only when every task has counted down. A wakeup that
    /// arrives early, or a wait that observes a poisoned lock, reports
    /// [`HarnessError::WaitInterrupted`]; the caller must wait again before
    /// reading anything the tasks produce.
    pub fn try_wait(&self) -> Result<()> {
        let remaining_guard = self.lock();
        if *remaining_guard == 0 {
            return Ok(());
        }

        match self.released.wait(remaining_guard) {
            Ok(guard) if *guard == 0 => Ok(()),
            Ok(_) => Err(HarnessError::WaitInterrupted),
            Err(poisoned) => {
                drop(poisoned.into_inner());
                self.remaining.clear_poison();
                Err(HarnessError::WaitInterrupted)
            }
        }
    }

    /// Blocks until every task has counted down, retrying interrupted waits.
    pub fn wait(&self) {
        let mut attempts = 0usize;
        while let Err(err) = self.try_wait() {
            attempts += 1;
            tracing::debug!(attempts, error = %err, "retrying completion wait");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Wakes waiters on `latch` every few milliseconds, whatever its count,
    /// until `stop` is set.
    fn spawn_spurious_notifier(
        latch: Arc<CompletionLatch>,
        stop: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            while !stop.load(SeqCst) {
                latch.released.notify_all();
                thread::sleep(Duration::from_millis(2));
            }
        })
    }

    #[test]
    fn test_zero_count_does_not_block() {
        let latch = CompletionLatch::new(0);
        assert!(latch.try_wait().is_ok());
        latch.wait();
    }

    #[test]
    fn test_count_down_saturates() {
        let latch = CompletionLatch::new(2);
        latch.count_down();
        latch.count_down();
        latch.count_down();
        assert_eq!(latch.count(), 0);
    }

    #[test]
    fn test_wait_releases_after_all_count_down() {
        let num_tasks = 16;
        let latch = Arc::new(CompletionLatch::new(num_tasks));

        let handles: Vec<_> = (0..num_tasks)
            .map(|_| {
                let latch = latch.clone();
                thread::spawn(move || latch.count_down())
            })
            .collect();

        latch.wait();
        assert_eq!(latch.count(), 0);

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_early_wakeup_reports_interrupted() {
        let latch = Arc::new(CompletionLatch::new(1));
        let stop = Arc::new(AtomicBool::new(false));
        let notifier = spawn_spurious_notifier(latch.clone(), stop.clone());

        // Woken while a task is still outstanding.
        assert!(matches!(
            latch.try_wait(),
            Err(HarnessError::WaitInterrupted)
        ));
        assert_eq!(latch.count(), 1);

        stop.store(true, SeqCst);
        notifier.join().unwrap();
    }

    #[test]
    fn test_wait_retries_until_last_count_down() {
        let latch = Arc::new(CompletionLatch::new(2));
        let stop = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let notifier = spawn_spurious_notifier(latch.clone(), stop.clone());

        latch.count_down();
        let last_task = {
            let latch = latch.clone();
            let finished = finished.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                finished.store(true, SeqCst);
                latch.count_down();
            })
        };

        latch.wait();
        assert!(finished.load(SeqCst));
        assert_eq!(latch.count(), 0);

        stop.store(true, SeqCst);
        notifier.join().unwrap();
        last_task.join().unwrap();
    }

    #[test]
    fn test_first_panic_is_kept() {
        let latch = CompletionLatch::new(3);
        assert_eq!(latch.panicked_worker(), None);

        latch.record_panic(2);
        latch.record_panic(0);
        assert_eq!(latch.panicked_worker(), Some(2));
    }
}
