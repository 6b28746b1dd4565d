//! Core scheduling types: jobs, per-client state, the scheduler registry,
//! and the worker pool.

pub mod client;
pub mod error;
pub mod job;
pub mod scheduler;
pub mod worker_pool;

pub use client::{ClientState, OverflowStrategy};
pub use error::{AppResult, SchedulerError};
pub use job::{Job, Task};
pub use scheduler::{ClientMetrics, GlobalMetrics, Scheduler};
pub use worker_pool::WorkerPool;
