//! Weighted round robin selection.

use crate::core::job::Job;
use crate::policy::{ClientMap, SchedulingPolicy};

/// Weighted Round Robin: each client receives up to `weight` consecutive
/// jobs before the cursor advances. Weight counts jobs per round; the cost
/// hint is ignored.
///
/// With a single worker and all jobs enqueued up front, the emitted order is
/// `c0^w0 c1^w1 ... ck^wk` repeated, skipping empty clients.
#[derive(Debug, Default)]
pub struct WeightedRoundRobin {
    /// Next client to attempt.
    rr_index: usize,
    /// Credits left for the current client in the current cycle.
    rr_remaining: usize,
}

impl WeightedRoundRobin {
    /// Create a policy with the cursor at the first registered client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulingPolicy for WeightedRoundRobin {
    fn on_client_registered(&mut self, _client_id: &str, _weight: usize) {
        // Weight is read from ClientState at selection time.
    }

    fn select_next_job(&mut self, client_order: &[String], clients: &ClientMap) -> Option<Job> {
        let n = client_order.len();

        for _ in 0..n {
            let client = &clients[&client_order[self.rr_index]];

            // Lazy refill on arrival at a new client.
            if self.rr_remaining == 0 {
                self.rr_remaining = client.weight;
            }

            let mut queue = client.queue.lock();
            if let Some(job) = queue.pop_front() {
                drop(queue);
                client.submit_cv.notify_one();
                self.rr_remaining -= 1;
                if self.rr_remaining == 0 {
                    self.rr_index = (self.rr_index + 1) % n; // quota exhausted
                }
                return Some(job);
            }
            drop(queue);

            // Work-conserving skip: empty client forfeits its round.
            self.rr_remaining = 0;
            self.rr_index = (self.rr_index + 1) % n;
        }

        None
    }
}
