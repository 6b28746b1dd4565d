//! The unit of work handed from producers to workers.

use std::fmt;
use std::time::Instant;

/// A nullary effectful task payload, consumed when executed.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An opaque work unit tagged with its owning client.
///
/// A job is owned by exactly one client queue until a policy pops it, at
/// which point ownership transfers to the executing worker. The task is
/// consumed on execution; the scheduler never looks inside it.
pub struct Job {
    /// Tenant that submitted the job.
    pub client_id: String,
    /// The work to run.
    pub task: Task,
    /// Monotonic timestamp captured at construction.
    pub enqueue_time: Instant,
    /// Monotonically increasing, process-unique identifier.
    pub job_id: u64,
    /// Credit cost for cost-aware policies; 1 = unit cost.
    pub cost_hint: u32,
}

impl Job {
    /// Create a job with unit cost and an unassigned id.
    ///
    /// The scheduler stamps `job_id` and `cost_hint` on the submission path.
    pub fn new(client_id: impl Into<String>, task: Task) -> Self {
        Self {
            client_id: client_id.into(),
            task,
            enqueue_time: Instant::now(),
            job_id: 0,
            cost_hint: 1,
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("client_id", &self.client_id)
            .field("job_id", &self.job_id)
            .field("cost_hint", &self.cost_hint)
            .field("enqueue_time", &self.enqueue_time)
            .finish_non_exhaustive()
    }
}
