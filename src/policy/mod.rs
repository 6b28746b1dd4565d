//! Pluggable fairness policies for cross-client job selection.
//!
//! A policy owns only its cursor/credit state; the per-client queues stay in
//! [`ClientState`]. The scheduler serializes every policy call behind its
//! policy mutex, so implementations need no internal synchronization beyond
//! briefly locking one client queue at a time.

mod drr;
mod wrr;

pub use drr::DeficitRoundRobin;
pub use wrr::WeightedRoundRobin;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::client::ClientState;
use crate::core::job::Job;

/// Registry view handed to policies: client id -> shared per-tenant state.
pub type ClientMap = HashMap<String, Arc<ClientState>>;

/// Picks the next job across all clients while preserving work-conservation:
/// a policy must never return `None` while any client has a job ready.
///
/// Guarantees made to implementations:
///
/// - `client_order` is stable, non-empty, and lists registration order; the
///   scheduler short-circuits an empty registry before calling in.
/// - `clients` contains an entry for every id in `client_order`.
/// - Calls are serialized; the policy has exclusive access to its own state.
///
/// Obligations: lock each client mutex only briefly, signal the drained
/// client's `submit_cv` after every pop (this is what unblocks
/// [`OverflowStrategy::Block`] producers), and leave the cursor in a
/// consistent state whether or not a job is returned.
///
/// [`OverflowStrategy::Block`]: crate::core::client::OverflowStrategy::Block
pub trait SchedulingPolicy: Send {
    /// One-shot initialization hook, called exactly once per client under
    /// the registry's exclusive lock.
    fn on_client_registered(&mut self, client_id: &str, weight: usize);

    /// Pop and return the next job, or `None` if every client queue is empty.
    fn select_next_job(&mut self, client_order: &[String], clients: &ClientMap) -> Option<Job>;

    /// Completion hook for time-aware policies. Default no-op.
    fn on_job_executed(&mut self, _client_id: &str, _duration: Duration) {}
}
