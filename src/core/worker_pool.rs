//! Fixed worker pool with cooperative wakeup and drain-then-stop shutdown.
//!
//! The pool is a consumer of the scheduler, not part of scheduling
//! semantics: it holds an `Arc<Scheduler>` and the scheduler knows nothing
//! about it. Workers loop `select_next_job` -> execute -> `record_execution`,
//! always running the task with no scheduler lock held.
//!
//! # Shutdown
//!
//! `shutdown` flips the pool into a draining phase in which idle workers no
//! longer sleep, polls until every client queue is empty (a coarse 1 ms spin
//! that closes the race between a producer's push and its notify), then
//! stops and joins all workers. After it returns no further job will run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use crate::config::WorkerPoolConfig;
use crate::core::error::SchedulerError;
use crate::core::job::Job;
use crate::core::scheduler::Scheduler;

/// Pool-level flags plus the idle-wait monitor shared with every worker.
struct PoolShared {
    /// False once drain has completed and workers are being stopped.
    running: AtomicBool,
    /// True from shutdown entry onward; idle workers stop sleeping.
    draining: AtomicBool,
    /// Stop request; workers exit their loop at the next check.
    stop: AtomicBool,
    /// Monitor guarding the flag transitions that end an idle wait.
    idle_mutex: Mutex<()>,
    idle_cv: Condvar,
}

impl PoolShared {
    /// Idle-wait predicate: sleeping is only allowed while none of these
    /// fire. Spurious wakeups are fine; the worker re-queries the scheduler.
    fn wake_requested(&self) -> bool {
        self.draining.load(Ordering::Acquire)
            || !self.running.load(Ordering::Acquire)
            || self.stop.load(Ordering::Acquire)
    }
}

/// A fixed set of worker threads draining one shared [`Scheduler`].
///
/// Workers start immediately on construction. Producers that want prompt
/// pickup call [`WorkerPool::notify_workers`] after submitting; the
/// scheduler itself never notifies.
pub struct WorkerPool {
    scheduler: Arc<Scheduler>,
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `worker_count` workers against `scheduler` with the default
    /// thread stack size.
    #[must_use]
    pub fn new(scheduler: Arc<Scheduler>, worker_count: usize) -> Self {
        Self::spawn(scheduler, worker_count, WorkerPoolConfig::default().thread_stack_size)
    }

    /// Spawn a pool from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(
        scheduler: Arc<Scheduler>,
        config: &WorkerPoolConfig,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self::spawn(
            scheduler,
            config.worker_count,
            config.thread_stack_size,
        ))
    }

    fn spawn(scheduler: Arc<Scheduler>, worker_count: usize, stack_size: usize) -> Self {
        let shared = Arc::new(PoolShared {
            running: AtomicBool::new(true),
            draining: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            idle_mutex: Mutex::new(()),
            idle_cv: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let scheduler = Arc::clone(&scheduler);
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("fs-worker-{worker_id}"))
                .stack_size(stack_size)
                .spawn(move || worker_loop(worker_id, &scheduler, &shared))
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }

        info!(worker_count, "worker pool started");
        Self {
            scheduler,
            shared,
            workers: Mutex::new(workers),
        }
    }

    /// Graceful shutdown: drain every client queue, then stop and join all
    /// workers. Idempotent in effect; a second call returns immediately.
    pub fn shutdown(&self) {
        if !self.shared.running.load(Ordering::Acquire) {
            return;
        }

        info!("draining worker pool");
        {
            let _guard = self.shared.idle_mutex.lock();
            self.shared.draining.store(true, Ordering::Release);
        }
        self.shared.idle_cv.notify_all();

        // Coarse poll until drained; re-notify each pass in case a worker
        // sampled "no job" just before a producer's push.
        while self.scheduler.has_pending_jobs() {
            self.shared.idle_cv.notify_all();
            thread::sleep(Duration::from_millis(1));
        }

        {
            let _guard = self.shared.idle_mutex.lock();
            self.shared.running.store(false, Ordering::Release);
            self.shared.stop.store(true, Ordering::Release);
        }
        self.shared.idle_cv.notify_all();

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock());
        let worker_count = handles.len();
        for handle in handles {
            if handle.join().is_err() {
                warn!("worker thread panicked outside job execution");
            }
        }
        info!(worker_count, "worker pool shut down");
    }

    /// Wake one idle worker. Called by producers after `submit`.
    pub fn notify_workers(&self) {
        self.shared.idle_cv.notify_one();
    }

    /// True until drain completes during shutdown.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Number of worker threads still attached; 0 once shutdown has joined
    /// them.
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.shared.running.load(Ordering::Acquire) {
            self.shutdown();
        }
    }
}

fn worker_loop(worker_id: usize, scheduler: &Scheduler, shared: &PoolShared) {
    debug!(worker_id, "worker started");

    while !shared.stop.load(Ordering::Acquire) {
        if let Some(job) = scheduler.select_next_job() {
            let Job {
                client_id, task, ..
            } = job;

            // Execute outside every scheduler/client lock.
            let start = Instant::now();
            if catch_unwind(AssertUnwindSafe(task)).is_err() {
                // A panicking task still counts as completed; the scheduler
                // invariants must survive misbehaving callers.
                warn!(worker_id, client_id = %client_id, "job panicked during execution");
            }
            scheduler.record_execution(&client_id, start.elapsed());
            continue;
        }

        if shared.draining.load(Ordering::Acquire) && !scheduler.has_pending_jobs() {
            break;
        }

        let mut guard = shared.idle_mutex.lock();
        if !shared.wake_requested() {
            shared.idle_cv.wait(&mut guard);
        }
    }

    debug!(worker_id, "worker exiting");
}
