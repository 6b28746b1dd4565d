//! Weighted round robin demo: a single worker exposes the exact
//! weight-proportional interleaving.
//!
//! Run with: `cargo run --example weighted_demo`

use std::sync::Arc;

use parking_lot::Mutex;

use fairshare::util::init_tracing;
use fairshare::{AppResult, ClientConfig, Scheduler, WorkerPool};

fn main() -> AppResult<()> {
    init_tracing();

    println!("=== WRR demo: weight-proportional service ===\n");

    let scheduler = Arc::new(Scheduler::new());
    scheduler.register_client("gold", ClientConfig::new().with_weight(3))?;
    scheduler.register_client("silver", ClientConfig::new().with_weight(2))?;
    scheduler.register_client("bronze", ClientConfig::new().with_weight(1))?;

    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    for (name, jobs) in [("gold", 6), ("silver", 4), ("bronze", 2)] {
        for _ in 0..jobs {
            let order = Arc::clone(&order);
            scheduler.submit(name, move || {
                order.lock().push(name);
            })?;
        }
    }

    // One worker drains in policy order; weights 3:2:1 show up directly.
    let pool = WorkerPool::new(Arc::clone(&scheduler), 1);
    pool.shutdown();

    println!("Execution order: {:?}\n", order.lock());

    for name in ["gold", "silver", "bronze"] {
        let m = scheduler.get_client_metrics(name)?;
        println!("{name:<8} weight={} executed={}", m.weight, m.executed);
    }

    let global = scheduler.get_global_metrics();
    println!("\nJain fairness index: {:.3}", global.jain_fairness_index);
    Ok(())
}
