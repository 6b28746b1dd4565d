//! Multi-tenant scheduler: client registry, submission with backpressure,
//! and policy-driven job selection.
//!
//! # Locking
//!
//! Three lock levels, always acquired in this order:
//!
//! 1. the registry `RwLock` (shared for submission/selection/metrics,
//!    exclusive only for registration),
//! 2. the policy mutex (serializes all cursor/credit mutation),
//! 3. a single client mutex (queue access; monitor for `Block` producers).
//!
//! Job execution never happens under any of these: `select_next_job` hands
//! the job out by value and the worker runs it lock-free.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::config::ClientConfig;
use crate::core::client::{ClientState, OverflowStrategy};
use crate::core::error::SchedulerError;
use crate::core::job::Job;
use crate::policy::{ClientMap, SchedulingPolicy, WeightedRoundRobin};

/// Snapshot of one client's counters.
///
/// Individual fields are read atomically but the snapshot as a whole is not
/// transactional: counters may advance between field reads.
#[derive(Debug, Clone, Default)]
pub struct ClientMetrics {
    /// Jobs accepted into the queue.
    pub submitted: u64,
    /// Jobs that finished executing.
    pub executed: u64,
    /// Mean execution time in microseconds; 0.0 before the first completion.
    pub avg_execution_time_us: f64,
    /// Queue depth at snapshot time.
    pub queue_depth: usize,
    /// Scheduling weight.
    pub weight: usize,
    /// Submissions that hit a full queue.
    pub overflow_count: u64,
}

/// Snapshot of scheduler-wide counters.
#[derive(Debug, Clone)]
pub struct GlobalMetrics {
    /// Total jobs executed across all clients.
    pub total_processed: u64,
    /// Number of registered clients.
    pub active_clients: usize,
    /// Jain fairness index over per-client executed counts, in `[1/n, 1.0]`;
    /// exactly 1.0 with fewer than two clients or no completions.
    pub jain_fairness_index: f64,
}

impl Default for GlobalMetrics {
    fn default() -> Self {
        Self {
            total_processed: 0,
            active_clients: 0,
            jain_fairness_index: 1.0,
        }
    }
}

/// Registry payload: the client map plus the stable registration order that
/// policies index into.
struct Registry {
    clients: ClientMap,
    client_order: Vec<String>,
}

/// The scheduling core. Accepts tagged submissions, applies per-client
/// backpressure, and lets the configured policy pick the next job for
/// whichever worker asks.
///
/// `Scheduler` is `Send + Sync`; producers and workers share it behind an
/// `Arc` without further locking.
pub struct Scheduler {
    registry: RwLock<Registry>,
    policy: Mutex<Box<dyn SchedulingPolicy>>,
    next_job_id: AtomicU64,
    total_processed: AtomicU64,
}

impl Scheduler {
    /// Create a scheduler with the default [`WeightedRoundRobin`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Box::new(WeightedRoundRobin::new()))
    }

    /// Create a scheduler with a caller-supplied policy.
    #[must_use]
    pub fn with_policy(policy: Box<dyn SchedulingPolicy>) -> Self {
        Self {
            registry: RwLock::new(Registry {
                clients: HashMap::new(),
                client_order: Vec::new(),
            }),
            policy: Mutex::new(policy),
            next_job_id: AtomicU64::new(1),
            total_processed: AtomicU64::new(0),
        }
    }

    /// Register a tenant. Clients live until the scheduler is dropped and
    /// cannot be unregistered.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::InvalidWeight`] if `config.weight == 0`
    /// - [`SchedulerError::AlreadyRegistered`] if the id is already known
    pub fn register_client(
        &self,
        client_id: &str,
        config: ClientConfig,
    ) -> Result<(), SchedulerError> {
        if config.weight == 0 {
            return Err(SchedulerError::InvalidWeight(client_id.to_string()));
        }

        let mut registry = self.registry.write();
        if registry.clients.contains_key(client_id) {
            return Err(SchedulerError::AlreadyRegistered(client_id.to_string()));
        }

        registry.clients.insert(
            client_id.to_string(),
            Arc::new(ClientState::new(
                client_id,
                config.weight,
                config.max_queue_depth,
                config.overflow_strategy,
            )),
        );
        registry.client_order.push(client_id.to_string());
        self.policy
            .lock()
            .on_client_registered(client_id, config.weight);

        debug!(
            client_id,
            weight = config.weight,
            max_queue_depth = config.max_queue_depth,
            strategy = ?config.overflow_strategy,
            "client registered"
        );
        Ok(())
    }

    /// Submit a unit-cost job for `client_id`.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::UnknownClient`] if the id is not registered
    /// - [`SchedulerError::QueueFull`] under the `Reject` strategy at capacity
    pub fn submit(
        &self,
        client_id: &str,
        task: impl FnOnce() + Send + 'static,
    ) -> Result<(), SchedulerError> {
        self.submit_with_cost(client_id, task, 1)
    }

    /// Submit a job with an explicit cost hint for cost-aware policies.
    ///
    /// Under the `Block` strategy this waits, holding only the client mutex,
    /// until the queue has room. Under `DropNewest` at capacity the call
    /// succeeds but the job is discarded and counted in `overflow_count`
    /// rather than `submitted`.
    ///
    /// # Errors
    ///
    /// Same as [`Scheduler::submit`].
    pub fn submit_with_cost(
        &self,
        client_id: &str,
        task: impl FnOnce() + Send + 'static,
        cost_hint: u32,
    ) -> Result<(), SchedulerError> {
        // Resolve under the shared lock, then release: the Arc keeps the
        // client alive for the enqueue below.
        let client = {
            let registry = self.registry.read();
            registry
                .clients
                .get(client_id)
                .cloned()
                .ok_or_else(|| SchedulerError::UnknownClient(client_id.to_string()))?
        };

        let mut job = Job::new(client_id, Box::new(task));
        job.job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        job.cost_hint = cost_hint;

        {
            let mut queue = client.queue.lock();
            if client.max_queue_depth > 0 {
                match client.overflow_strategy {
                    OverflowStrategy::Reject => {
                        if queue.len() >= client.max_queue_depth {
                            client.overflow.fetch_add(1, Ordering::Relaxed);
                            return Err(SchedulerError::QueueFull(client_id.to_string()));
                        }
                    }
                    OverflowStrategy::Block => {
                        while queue.len() >= client.max_queue_depth {
                            client.submit_cv.wait(&mut queue);
                        }
                    }
                    OverflowStrategy::DropOldest => {
                        if queue.len() >= client.max_queue_depth {
                            queue.pop_front();
                            client.overflow.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    OverflowStrategy::DropNewest => {
                        if queue.len() >= client.max_queue_depth {
                            client.overflow.fetch_add(1, Ordering::Relaxed);
                            // Accepted from the caller's view, never enqueued.
                            return Ok(());
                        }
                    }
                }
            }
            queue.push_back(job);
        }
        client.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Pop the next job according to the policy, or `None` if every client
    /// queue is empty. Ownership transfers to the caller; the scheduler does
    /// not execute jobs.
    pub fn select_next_job(&self) -> Option<Job> {
        let registry = self.registry.read();
        if registry.client_order.is_empty() {
            return None;
        }
        let mut policy = self.policy.lock();
        policy.select_next_job(&registry.client_order, &registry.clients)
    }

    /// Record a completed execution: bumps the client's `executed` and
    /// timing counters, the global processed count, and notifies the policy.
    ///
    /// An unknown id is ignored; it cannot occur when the id came from a
    /// job this scheduler handed out.
    pub fn record_execution(&self, client_id: &str, duration: Duration) {
        let registry = self.registry.read();
        let Some(client) = registry.clients.get(client_id) else {
            return;
        };

        client.executed.fetch_add(1, Ordering::Relaxed);
        let micros = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);
        client
            .total_execution_time_us
            .fetch_add(micros, Ordering::Relaxed);
        self.total_processed.fetch_add(1, Ordering::Relaxed);

        self.policy.lock().on_job_executed(client_id, duration);
    }

    /// True iff any client queue is non-empty.
    pub fn has_pending_jobs(&self) -> bool {
        let registry = self.registry.read();
        registry
            .clients
            .values()
            .any(|client| !client.queue.lock().is_empty())
    }

    /// Snapshot one client's counters.
    ///
    /// Fields are read independently (atomics, then the client mutex for
    /// depth); the snapshot is per-field consistent, not transactional.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::UnknownClient`] if the id is not registered.
    pub fn get_client_metrics(&self, client_id: &str) -> Result<ClientMetrics, SchedulerError> {
        let registry = self.registry.read();
        let client = registry
            .clients
            .get(client_id)
            .ok_or_else(|| SchedulerError::UnknownClient(client_id.to_string()))?;

        let executed = client.executed.load(Ordering::Relaxed);
        let total_us = client.total_execution_time_us.load(Ordering::Relaxed);
        #[allow(clippy::cast_precision_loss)]
        let avg_execution_time_us = if executed > 0 {
            total_us as f64 / executed as f64
        } else {
            0.0
        };

        Ok(ClientMetrics {
            submitted: client.submitted.load(Ordering::Relaxed),
            executed,
            avg_execution_time_us,
            queue_depth: client.queue_depth(),
            weight: client.weight,
            overflow_count: client.overflow.load(Ordering::Relaxed),
        })
    }

    /// Snapshot scheduler-wide counters, including the Jain fairness index
    /// `(sum x)^2 / (n * sum x^2)` over per-client executed counts.
    #[allow(clippy::cast_precision_loss)]
    pub fn get_global_metrics(&self) -> GlobalMetrics {
        let registry = self.registry.read();

        let mut metrics = GlobalMetrics {
            total_processed: self.total_processed.load(Ordering::Relaxed),
            active_clients: registry.clients.len(),
            jain_fairness_index: 1.0,
        };

        if registry.clients.len() < 2 {
            return metrics;
        }

        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        for client in registry.clients.values() {
            let x = client.executed.load(Ordering::Relaxed) as f64;
            sum += x;
            sum_sq += x * x;
        }

        if sum_sq > 0.0 {
            let n = registry.clients.len() as f64;
            metrics.jain_fairness_index = (sum * sum) / (n * sum_sq);
        }
        metrics
    }

    /// Total jobs executed across all clients.
    pub fn total_jobs_processed(&self) -> u64 {
        self.total_processed.load(Ordering::Relaxed)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
