//! # Fairshare
//!
//! A multi-tenant, in-process job scheduling core. Producers submit opaque
//! units of work tagged with a client identity; a fixed pool of worker
//! threads drains the per-client queues under a pluggable fairness policy.
//!
//! Each registered client gets its own FIFO queue, weight, backpressure
//! contract, and metrics counters. Absent an overflow eviction, every
//! accepted job runs exactly once, and graceful shutdown drains all
//! outstanding work before stopping the workers.
//!
//! ## Modules
//!
//! - [`core`] - jobs, per-client state, the scheduler registry, the worker pool
//! - [`policy`] - the [`SchedulingPolicy`] trait and the built-in
//!   [`WeightedRoundRobin`] / [`DeficitRoundRobin`] policies
//! - [`config`] - serde-friendly configuration with builders and validation
//! - [`util`] - telemetry helpers
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use fairshare::{ClientConfig, Scheduler, WorkerPool};
//!
//! let scheduler = Arc::new(Scheduler::new());
//! scheduler.register_client("tenant-a", ClientConfig::new().with_weight(3)).unwrap();
//! scheduler.register_client("tenant-b", ClientConfig::new()).unwrap();
//!
//! let pool = WorkerPool::new(Arc::clone(&scheduler), 4);
//!
//! scheduler.submit("tenant-a", || println!("hello from tenant-a")).unwrap();
//! pool.notify_workers();
//!
//! // Drains both queues, then stops and joins every worker.
//! pool.shutdown();
//!
//! let metrics = scheduler.get_client_metrics("tenant-a").unwrap();
//! assert_eq!(metrics.executed, 1);
//! ```
//!
//! ## Cost-aware scheduling
//!
//! ```
//! use std::sync::Arc;
//! use fairshare::{ClientConfig, DeficitRoundRobin, Scheduler, WorkerPool};
//!
//! let scheduler = Arc::new(Scheduler::with_policy(Box::new(DeficitRoundRobin::new(100))));
//! scheduler.register_client("bulk", ClientConfig::new()).unwrap();
//!
//! // Expensive jobs carry a larger cost hint and consume more credit.
//! scheduler.submit_with_cost("bulk", || { /* heavy work */ }, 50).unwrap();
//!
//! let pool = WorkerPool::new(Arc::clone(&scheduler), 2);
//! pool.shutdown();
//! ```

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod core;
pub mod policy;
pub mod util;

// Re-export main types for convenience
pub use crate::config::{ClientConfig, PolicyConfig, SchedulerConfig, WorkerPoolConfig};
pub use crate::core::{
    AppResult, ClientMetrics, GlobalMetrics, Job, OverflowStrategy, Scheduler, SchedulerError,
    Task, WorkerPool,
};
pub use crate::policy::{ClientMap, DeficitRoundRobin, SchedulingPolicy, WeightedRoundRobin};
