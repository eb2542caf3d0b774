//! Fan-out/join of sync workers across all discovered repositories

use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::worker::{sync_repository, WorkerContext};
use crate::core::stats::SyncStatistics;
use crate::ui::PromptFn;

/// Runs one synchronization pass over every repository and reduces the
/// per-repository change flags with an associative OR.
///
/// One task per repository, all launched together and joined together; no
/// reporting order is guaranteed across repositories. A worker failure is
/// reported for that repository only and never aborts its siblings. The
/// fan-out is bounded by `concurrency` permits.
pub async fn run_pass(
    repos: &[(String, PathBuf)],
    do_pull: bool,
    concurrency: usize,
    prompt: PromptFn,
) -> bool {
    let start_time = std::time::Instant::now();
    let ctx = WorkerContext::new(prompt);
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let statistics = Arc::new(Mutex::new(SyncStatistics::new()));

    let mut futures = FuturesUnordered::new();
    for (repo_name, repo_path) in repos {
        let repo_name = repo_name.clone();
        let repo_path = repo_path.clone();
        let ctx = ctx.clone();
        let semaphore = Arc::clone(&semaphore);
        let statistics = Arc::clone(&statistics);

        futures.push(async move {
            let Ok(_permit) = semaphore.acquire().await else {
                // Semaphore is never closed while the pass runs
                return false;
            };

            match sync_repository(&repo_name, &repo_path, do_pull, &ctx).await {
                Ok(outcome) => {
                    let mut stats = statistics.lock().expect("statistics mutex poisoned");
                    stats.update(&outcome);
                    outcome.caused_change()
                }
                Err(e) => {
                    let mut stats = statistics.lock().expect("statistics mutex poisoned");
                    stats.record_failure(&repo_name, &e.to_string());
                    drop(stats);

                    // Serialize the failure line with the repository blocks
                    let _guard = ctx.output.lock().await;
                    eprintln!("🔴 {repo_name}  {e}");
                    false
                }
            }
        });
    }

    let mut changed = false;
    while let Some(repo_changed) = futures.next().await {
        changed |= repo_changed;
    }

    let stats = statistics.lock().expect("statistics mutex poisoned");
    println!("{}", stats.generate_summary(start_time.elapsed()));

    changed
}
