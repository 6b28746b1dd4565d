//! Per-tenant queue, backpressure contract, and metrics counters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64};

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

use crate::core::job::Job;

/// What `submit` does when a bounded queue is at capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    /// Fail the submission with [`SchedulerError::QueueFull`].
    ///
    /// [`SchedulerError::QueueFull`]: crate::core::error::SchedulerError::QueueFull
    #[default]
    Reject,
    /// Block the producer until a slot frees up.
    ///
    /// The producer is woken by the policy after any successful dequeue for
    /// this client. Shutdown does not wake blocked producers; a caller must
    /// not block-submit if shutdown may occur while the queue stays full.
    Block,
    /// Evict the oldest queued job (lost unexecuted) to make room.
    DropOldest,
    /// Discard the incoming job.
    DropNewest,
}

/// Per-tenant state, owned by the scheduler registry for the client's
/// lifetime and shared with policies and workers via `Arc`.
///
/// The queue mutex doubles as the monitor for `submit_cv`: producers under
/// the `Block` strategy wait on it, and policies signal it after popping a
/// job. The metric counters are plain atomics, readable without any lock.
pub struct ClientState {
    /// Tenant key, unique within a registry.
    pub client_id: String,
    /// Scheduling weight (>= 1), immutable after registration.
    pub weight: usize,
    /// FIFO of pending jobs.
    pub queue: Mutex<VecDeque<Job>>,
    /// Signalled when a slot frees up; paired with `queue`.
    pub submit_cv: Condvar,
    /// Queue capacity; 0 = unlimited.
    pub max_queue_depth: usize,
    /// Behavior when the queue is at capacity.
    pub overflow_strategy: OverflowStrategy,
    /// Jobs accepted into the queue.
    pub submitted: AtomicU64,
    /// Jobs that finished executing.
    pub executed: AtomicU64,
    /// Sum of execution durations, in microseconds.
    pub total_execution_time_us: AtomicI64,
    /// Submissions that hit a full queue (rejected, dropped, or evicted).
    pub overflow: AtomicU64,
}

impl ClientState {
    pub(crate) fn new(
        client_id: impl Into<String>,
        weight: usize,
        max_queue_depth: usize,
        overflow_strategy: OverflowStrategy,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            weight,
            queue: Mutex::new(VecDeque::new()),
            submit_cv: Condvar::new(),
            max_queue_depth,
            overflow_strategy,
            submitted: AtomicU64::new(0),
            executed: AtomicU64::new(0),
            total_execution_time_us: AtomicI64::new(0),
            overflow: AtomicU64::new(0),
        }
    }

    /// Current queue depth. Takes the queue mutex briefly.
    pub fn queue_depth(&self) -> usize {
        self.queue.lock().len()
    }
}
