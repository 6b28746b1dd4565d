//! Deficit round robin selection.

use std::collections::HashMap;

use crate::core::job::Job;
use crate::policy::{ClientMap, SchedulingPolicy};

/// Default credits added per round, scaled by client weight.
const DEFAULT_BASE_QUANTUM: u32 = 100;

/// Deficit Round Robin: each client earns `weight * base_quantum` credits
/// per round and each job deducts its cost hint. A client keeps serving
/// while its deficit stays positive; idle clients do not accumulate credit.
///
/// A job whose cost exceeds one round of credit drives the deficit negative
/// and simply consumes several rounds of refill amortized. With
/// `base_quantum = 1` and unit costs the observable order degrades to
/// [`WeightedRoundRobin`] with the same weights.
///
/// [`WeightedRoundRobin`]: crate::policy::WeightedRoundRobin
#[derive(Debug)]
pub struct DeficitRoundRobin {
    base_quantum: u32,
    drr_index: usize,
    /// Credit balance per client; signed, may go negative on oversized jobs.
    deficit: HashMap<String, i64>,
}

impl DeficitRoundRobin {
    /// Create a policy adding `weight * base_quantum` credits per round.
    #[must_use]
    pub fn new(base_quantum: u32) -> Self {
        Self {
            base_quantum,
            drr_index: 0,
            deficit: HashMap::new(),
        }
    }
}

impl Default for DeficitRoundRobin {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_QUANTUM)
    }
}

impl SchedulingPolicy for DeficitRoundRobin {
    fn on_client_registered(&mut self, client_id: &str, _weight: usize) {
        self.deficit.insert(client_id.to_string(), 0);
    }

    fn select_next_job(&mut self, client_order: &[String], clients: &ClientMap) -> Option<Job> {
        let n = client_order.len();

        for _ in 0..n {
            let current = &client_order[self.drr_index];
            let client = &clients[current];

            let mut queue = client.queue.lock();
            match queue.pop_front() {
                None => {
                    drop(queue);
                    // No carry for idle clients.
                    self.deficit.insert(current.clone(), 0);
                    self.drr_index = (self.drr_index + 1) % n;
                }
                Some(job) => {
                    drop(queue);
                    let credit = self.deficit.entry(current.clone()).or_insert(0);
                    if *credit <= 0 {
                        *credit += client.weight as i64 * i64::from(self.base_quantum);
                    }
                    *credit -= i64::from(job.cost_hint);
                    if *credit <= 0 {
                        // Quota spent; next call starts at the next client.
                        self.drr_index = (self.drr_index + 1) % n;
                    }
                    client.submit_cv.notify_one();
                    return Some(job);
                }
            }
        }

        None
    }
}
