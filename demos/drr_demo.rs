//! DRR demo: cost-aware scheduling.
//!
//! Three clients with equal weights but very different per-job costs. With
//! deficit round robin each client earns the same credit per round, so the
//! cheap-job client runs many more jobs per cycle than the expensive one.
//!
//! Run with: `cargo run --example drr_demo`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fairshare::util::init_tracing;
use fairshare::{AppResult, ClientConfig, DeficitRoundRobin, Scheduler, WorkerPool};

fn main() -> AppResult<()> {
    init_tracing();

    println!("=== DRR demo: cost-aware scheduling ===\n");

    let scheduler = Arc::new(Scheduler::with_policy(Box::new(DeficitRoundRobin::new(100))));
    scheduler.register_client("fast", ClientConfig::new())?;
    scheduler.register_client("medium", ClientConfig::new())?;
    scheduler.register_client("slow", ClientConfig::new())?;

    let fast_done = Arc::new(AtomicUsize::new(0));
    let medium_done = Arc::new(AtomicUsize::new(0));
    let slow_done = Arc::new(AtomicUsize::new(0));

    const FAST_JOBS: usize = 100;
    const MEDIUM_JOBS: usize = 10;
    const SLOW_JOBS: usize = 1;

    for _ in 0..FAST_JOBS {
        let done = Arc::clone(&fast_done);
        scheduler.submit_with_cost(
            "fast",
            move || {
                done.fetch_add(1, Ordering::Relaxed);
            },
            1,
        )?;
    }
    for _ in 0..MEDIUM_JOBS {
        let done = Arc::clone(&medium_done);
        scheduler.submit_with_cost(
            "medium",
            move || {
                done.fetch_add(1, Ordering::Relaxed);
            },
            10,
        )?;
    }
    for _ in 0..SLOW_JOBS {
        let done = Arc::clone(&slow_done);
        scheduler.submit_with_cost(
            "slow",
            move || {
                done.fetch_add(1, Ordering::Relaxed);
            },
            100,
        )?;
    }

    let pool = WorkerPool::new(Arc::clone(&scheduler), 2);
    pool.shutdown();

    println!("Jobs completed:");
    println!("  fast   : {} / {FAST_JOBS}", fast_done.load(Ordering::Relaxed));
    println!(
        "  medium : {} / {MEDIUM_JOBS}",
        medium_done.load(Ordering::Relaxed)
    );
    println!("  slow   : {} / {SLOW_JOBS}", slow_done.load(Ordering::Relaxed));

    let global = scheduler.get_global_metrics();
    println!("\nGlobal metrics:");
    println!("  total_processed    : {}", global.total_processed);
    println!("  active_clients     : {}", global.active_clients);
    println!("  jain_fairness_index: {:.3}", global.jain_fairness_index);
    Ok(())
}
