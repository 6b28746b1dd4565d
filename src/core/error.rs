//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Quiescence states (empty registry, empty queues, an idle worker) are not
/// errors; they surface as `None` / `false` returns instead.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Client weight must be at least 1.
    #[error("invalid weight for client `{0}`: weight must be >= 1")]
    InvalidWeight(String),
    /// The client id is already present in the registry.
    #[error("client already registered: {0}")]
    AlreadyRegistered(String),
    /// The client id is not present in the registry.
    #[error("unknown client: {0}")]
    UnknownClient(String),
    /// Queue is full for the target client.
    #[error("queue full for client: {0}")]
    QueueFull(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
