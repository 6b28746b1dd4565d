//! Serde-friendly configuration with builders and validation.

pub mod scheduler;

pub use scheduler::{ClientConfig, PolicyConfig, SchedulerConfig, WorkerPoolConfig};
