// src/crawl/queue.rs
// =============================================================================
// A work queue that runs at most N tasks at once and knows when it is done.
//
// How it works:
// 1. `submit` bumps an "outstanding" counter, then spawns the task
// 2. The spawned task waits for a semaphore permit (N permits = N running)
// 3. When the task finishes, the counter goes down
// 4. `drain` waits until the counter is zero
//
// Tasks may submit more tasks while they run (a page discovers links). The
// child is counted *before* the parent finishes, so the counter can never
// touch zero between "parent done" and "child submitted". That is what
// makes `drain` safe for a task graph that keeps growing.
//
// Rust concepts:
// - Semaphore: a pool of N permits; acquiring one waits if none are free
// - AtomicUsize: a counter many tasks can update without a lock
// - Notify: lets `drain` sleep until someone tells it to look again
// - Drop: we decrement the counter in a destructor so it also happens if a
//   task panics
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

struct Inner {
    permits: Arc<Semaphore>,
    // Pending + running tasks
    outstanding: AtomicUsize,
    idle: Notify,
    concurrency: usize,
}

/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct WorkQueue {
    inner: Arc<Inner>,
}

// Counts one task as outstanding for as long as it lives
struct Outstanding(Arc<Inner>);

impl Outstanding {
    fn new(inner: Arc<Inner>) -> Self {
        inner.outstanding.fetch_add(1, Ordering::SeqCst);
        Self(inner)
    }
}

impl Drop for Outstanding {
    fn drop(&mut self) {
        if self.0.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl WorkQueue {
    /// Creates a queue running at most `concurrency` tasks at a time.
    /// A concurrency of 0 is treated as 1.
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            inner: Arc::new(Inner {
                permits: Arc::new(Semaphore::new(concurrency)),
                outstanding: AtomicUsize::new(0),
                idle: Notify::new(),
                concurrency,
            }),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.inner.concurrency
    }

    /// Number of tasks submitted but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }

    /// Queues a task. Must be called from inside a tokio runtime.
    pub fn submit<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Counted here, on the caller's side, before anything can finish
        let outstanding = Outstanding::new(Arc::clone(&self.inner));
        let permits = Arc::clone(&self.inner.permits);
        let task: BoxFuture<'static, ()> = task.boxed();

        tokio::spawn(async move {
            let _outstanding = outstanding;
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            task.await;
        });
    }

    /// Waits until no task is pending or running, including tasks that were
    /// submitted by other tasks while we were waiting.
    pub async fn drain(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking, so a notify between the check and
            // the await isn't lost
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just use buffer_unordered like a fixed list of URLs would?
//    - buffer_unordered needs to know all the work up front
//    - Here every page can add more pages while it runs
//    - So we need a queue that keeps accepting work and a way to tell when
//      the *whole* graph of work is done
//
// 2. What is a BoxFuture?
//    - Every async block has its own anonymous type
//    - Boxing turns them all into one type: Pin<Box<dyn Future + Send>>
//
// 3. Why register with Notify *before* checking the counter?
//    - If we checked first, the last task could finish and notify in the gap
//      between our check and our await, and we'd sleep forever
//    - enable() makes the notification stick even if it arrives early
// -----------------------------------------------------------------------------
