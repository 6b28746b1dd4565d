//! Basic demo: three tenants sharing a four-worker pool, metrics printed
//! after a graceful drain.
//!
//! Run with: `cargo run --example basic_demo`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fairshare::util::init_tracing;
use fairshare::{AppResult, ClientConfig, Scheduler, WorkerPool};

const NUM_WORKERS: usize = 4;
const JOBS_PER_CLIENT: usize = 50;
const CLIENTS: [&str; 3] = ["alice", "bob", "charlie"];

fn main() -> AppResult<()> {
    init_tracing();

    println!("=== Fairshare basic demo ===");
    println!(
        "Workers: {NUM_WORKERS} | Clients: {} | Jobs per client: {JOBS_PER_CLIENT}\n",
        CLIENTS.len()
    );

    let scheduler = Arc::new(Scheduler::new());
    let pool = WorkerPool::new(Arc::clone(&scheduler), NUM_WORKERS);

    for name in CLIENTS {
        scheduler.register_client(name, ClientConfig::new())?;
    }

    for name in CLIENTS {
        for i in 0..JOBS_PER_CLIENT {
            scheduler.submit(name, move || {
                // Simulate variable workload
                thread::sleep(Duration::from_micros(50 + (i as u64 % 10) * 10));
            })?;
        }
    }
    pool.notify_workers();

    println!("All jobs submitted. Shutting down (draining queues)...\n");
    pool.shutdown();

    println!(
        "{:<12} {:>10} {:>10} {:>14} {:>12}",
        "Client", "Submitted", "Executed", "Avg Time(us)", "Queue Depth"
    );
    for name in CLIENTS {
        let m = scheduler.get_client_metrics(name)?;
        println!(
            "{:<12} {:>10} {:>10} {:>14.1} {:>12}",
            name, m.submitted, m.executed, m.avg_execution_time_us, m.queue_depth
        );
    }

    println!(
        "\nTotal jobs processed: {}",
        scheduler.total_jobs_processed()
    );
    Ok(())
}
