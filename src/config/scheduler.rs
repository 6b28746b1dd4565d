//! Scheduler and worker pool configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::client::OverflowStrategy;
use crate::core::error::SchedulerError;
use crate::core::scheduler::Scheduler;
use crate::policy::{DeficitRoundRobin, SchedulingPolicy, WeightedRoundRobin};

/// Default scheduling weight.
fn default_weight() -> usize {
    1
}

/// Default DRR credits per round.
fn default_base_quantum() -> u32 {
    100
}

/// Default number of worker threads: CPU count.
fn default_worker_count() -> usize {
    num_cpus::get()
}

/// Default thread stack size: 2MB.
fn default_thread_stack_size() -> usize {
    2 * 1024 * 1024
}

/// Fairness policy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Weight-proportional job counts per round.
    WeightedRoundRobin,
    /// Cost-aware credit scheduling.
    DeficitRoundRobin {
        /// Credits added per round, scaled by client weight.
        #[serde(default = "default_base_quantum")]
        base_quantum: u32,
    },
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::WeightedRoundRobin
    }
}

impl PolicyConfig {
    /// Instantiate the configured policy.
    #[must_use]
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            Self::WeightedRoundRobin => Box::new(WeightedRoundRobin::new()),
            Self::DeficitRoundRobin { base_quantum } => {
                Box::new(DeficitRoundRobin::new(*base_quantum))
            }
        }
    }
}

/// Per-client registration settings.
///
/// # Example
///
/// ```
/// use fairshare::{ClientConfig, OverflowStrategy};
///
/// let config = ClientConfig::new()
///     .with_weight(4)
///     .with_max_queue_depth(256)
///     .with_overflow_strategy(OverflowStrategy::DropOldest);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheduling weight; must be >= 1.
    #[serde(default = "default_weight")]
    pub weight: usize,
    /// Queue capacity; 0 = unlimited.
    #[serde(default)]
    pub max_queue_depth: usize,
    /// Behavior when the queue is at capacity.
    #[serde(default)]
    pub overflow_strategy: OverflowStrategy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            weight: default_weight(),
            max_queue_depth: 0,
            overflow_strategy: OverflowStrategy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with default values (weight 1, unlimited
    /// queue, `Reject`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scheduling weight.
    #[must_use]
    pub fn with_weight(mut self, weight: usize) -> Self {
        self.weight = weight;
        self
    }

    /// Set the queue capacity (0 = unlimited).
    #[must_use]
    pub fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = depth;
        self
    }

    /// Set the overflow strategy.
    #[must_use]
    pub fn with_overflow_strategy(mut self, strategy: OverflowStrategy) -> Self {
        self.overflow_strategy = strategy;
        self
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.weight == 0 {
            return Err("weight must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root scheduler configuration: a policy plus a map of client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Fairness policy to install.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Map of client id to configuration.
    pub clients: HashMap<String, ClientConfig>,
}

impl SchedulerConfig {
    /// Validate all clients and ensure at least one client exists.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid entry.
    pub fn validate(&self) -> Result<(), String> {
        if self.clients.is_empty() {
            return Err("at least one client must be defined".into());
        }
        for (id, client) in &self.clients {
            client
                .validate()
                .map_err(|e| format!("client `{id}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse a scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a scheduler with the configured policy and clients registered
    /// in sorted-id order, so the registration order (and thus policy cursor
    /// order) is deterministic.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] on validation failure, or any
    /// registration error.
    pub fn build(&self) -> Result<Scheduler, SchedulerError> {
        self.validate().map_err(SchedulerError::InvalidConfig)?;

        let scheduler = Scheduler::with_policy(self.policy.build());
        let mut ids: Vec<&String> = self.clients.keys().collect();
        ids.sort();
        for id in ids {
            scheduler.register_client(id, self.clients[id].clone())?;
        }
        Ok(scheduler)
    }
}

/// Configuration for the [`WorkerPool`].
///
/// [`WorkerPool`]: crate::core::worker_pool::WorkerPool
///
/// # Example
///
/// ```
/// use fairshare::WorkerPoolConfig;
///
/// let config = WorkerPoolConfig::new()
///     .with_worker_count(4)
///     .with_thread_stack_size(1024 * 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Number of worker threads.
    ///
    /// Default: `num_cpus::get()`.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Stack size per worker thread in bytes.
    ///
    /// Default: 2MB (2 * 1024 * 1024 bytes).
    #[serde(default = "default_thread_stack_size")]
    pub thread_stack_size: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            thread_stack_size: default_thread_stack_size(),
        }
    }
}

impl WorkerPoolConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the thread stack size in bytes.
    #[must_use]
    pub fn with_thread_stack_size(mut self, size: usize) -> Self {
        self.thread_stack_size = size;
        self
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.thread_stack_size < 64 * 1024 {
            return Err("thread_stack_size must be at least 64KB".into());
        }
        Ok(())
    }
}
