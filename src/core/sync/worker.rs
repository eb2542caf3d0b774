//! Per-repository synchronization state machine: inspect → decide → act

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::config::TITLE_RULE_WIDTH;
use crate::git::{
    branch_header_is_ahead, compact_status, GitCommander, RepoStatus, UP_TO_DATE_SENTINEL,
};
use crate::ui::{spinner, Answer, PromptFn};

/// Per-repository result of one synchronization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to do
    Clean,
    /// A pull fetched new commits
    PulledUpdate,
    /// Local changes were committed and pushed
    Committed,
    /// A previously failed push was retried
    PushRetried,
    /// The user declined the offered action
    Skipped,
}

impl SyncOutcome {
    /// True when this outcome marks the whole run as changed.
    pub fn caused_change(&self) -> bool {
        matches!(
            self,
            SyncOutcome::PulledUpdate | SyncOutcome::Committed | SyncOutcome::PushRetried
        )
    }
}

/// Shared context handed to every worker in one pass.
#[derive(Clone)]
pub struct WorkerContext {
    pub prompt: PromptFn,
    /// Serializes one repository's header/status/prompt block; two
    /// repositories' console output must never interleave.
    pub output: Arc<Mutex<()>>,
}

impl WorkerContext {
    pub fn new(prompt: PromptFn) -> Self {
        Self {
            prompt,
            output: Arc::new(Mutex::new(())),
        }
    }
}

/// Default commit message for the affirmative prompt response.
pub fn default_commit_message() -> String {
    format!("Update {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
}

fn title_block(name: &str) -> String {
    let mut chars = name.chars();
    let display = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("\n{display}\n{}", "=".repeat(TITLE_RULE_WIDTH))
}

/// Computes the repository's working-tree and tracking state. Never cached:
/// add, commit and pull all invalidate a previous snapshot.
async fn inspect(git: &GitCommander) -> Result<RepoStatus> {
    let diff = git.query(&["diff"]).await?;
    let status = git.query(&["status", "--porcelain"]).await?;
    let branch_header = git.query(&["status", "--porcelain", "-b"]).await?;
    Ok(RepoStatus {
        has_diff: !diff.is_empty(),
        status,
        is_ahead: branch_header_is_ahead(&branch_header),
    })
}

/// Waits for the background pull launched on the dirty branch. Joining
/// before the commit is mandatory: committing before the pull lands risks
/// committing against a stale base.
pub async fn join_background_pull(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        eprintln!("background pull task failed: {e}");
    }
}

/// Runs the full state machine for one repository.
///
/// In pull mode only the pull branch is taken. Otherwise a repository with
/// pending work enters the dirty branch, a repository whose only anomaly is
/// unpushed commits (a push that failed on an earlier run) enters the
/// retry-push branch, and a clean repository resolves silently.
pub async fn sync_repository(
    name: &str,
    path: &Path,
    do_pull: bool,
    ctx: &WorkerContext,
) -> Result<SyncOutcome> {
    let git = GitCommander::new(path);
    let state = inspect(&git).await?;

    if do_pull {
        return pull_branch(name, &git, ctx).await;
    }

    if state.has_diff || state.has_pending() {
        return dirty_branch(name, &git, &state, ctx).await;
    }

    if state.is_ahead_only() {
        return ahead_branch(name, &git, ctx).await;
    }

    Ok(SyncOutcome::Clean)
}

async fn pull_branch(name: &str, git: &GitCommander, ctx: &WorkerContext) -> Result<SyncOutcome> {
    let pull = git.query(&["pull"]).await?;
    if pull.contains(UP_TO_DATE_SENTINEL) {
        // No header, no aggregate change for an up-to-date repository
        return Ok(SyncOutcome::Clean);
    }

    let _guard = ctx.output.lock().await;
    println!("{}", title_block(name));
    println!("{pull}");
    println!();
    Ok(SyncOutcome::PulledUpdate)
}

async fn dirty_branch(
    name: &str,
    git: &GitCommander,
    state: &RepoStatus,
    ctx: &WorkerContext,
) -> Result<SyncOutcome> {
    // Held across the whole report-and-decide sequence, prompt included
    let _guard = ctx.output.lock().await;
    println!("{}", title_block(name));

    let adding = spinner("Adding changes..");
    git.query(&["add", "."]).await?;
    let status = git.query(&["status", "--porcelain"]).await?;
    adding.finish_and_clear();

    let outcome = if !status.is_empty() {
        println!("{}", compact_status(&status));
        println!();

        // Race the pull against the prompt wait; the join below establishes
        // pull-completion happens-before commit
        let pull = git.spawn_pull();

        match resolve_commit_message(git, ctx).await? {
            Some(message) => {
                join_background_pull(pull).await;
                git.query(&["commit", "-m", &message]).await?;
                git.act(&["push"]).await?;
                SyncOutcome::Committed
            }
            // Declined: the abandoned pull finishes on its own and must not
            // abort anything
            None => SyncOutcome::Skipped,
        }
    } else if state.is_ahead {
        // Staging resolved everything but unpushed commits remain
        retry_push(git, ctx).await?
    } else {
        println!("cleaned");
        SyncOutcome::Clean
    };

    println!();
    Ok(outcome)
}

async fn ahead_branch(name: &str, git: &GitCommander, ctx: &WorkerContext) -> Result<SyncOutcome> {
    let _guard = ctx.output.lock().await;
    println!("{}", title_block(name));
    let outcome = retry_push(git, ctx).await?;
    println!();
    Ok(outcome)
}

async fn retry_push(git: &GitCommander, ctx: &WorkerContext) -> Result<SyncOutcome> {
    if (ctx.prompt)("Retry push?".to_string()).await?.is_affirmative() {
        git.act(&["push"]).await?;
        Ok(SyncOutcome::PushRetried)
    } else {
        Ok(SyncOutcome::Skipped)
    }
}

/// Prompt loop for the dirty branch: `show` displays the verbose status and
/// re-asks; an affirmative default produces a timestamped message; free text
/// becomes the message; empty or negative skips the commit.
async fn resolve_commit_message(git: &GitCommander, ctx: &WorkerContext) -> Result<Option<String>> {
    loop {
        match (ctx.prompt)("Commit and push?".to_string()).await? {
            Answer::ShowMore => {
                git.act_unchecked(&["status", "-v"]).await;
            }
            Answer::Yes => return Ok(Some(default_commit_message())),
            Answer::Text(message) => return Ok(Some(message)),
            Answer::No => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_caused_change_mapping() {
        assert!(!SyncOutcome::Clean.caused_change());
        assert!(!SyncOutcome::Skipped.caused_change());
        assert!(SyncOutcome::PulledUpdate.caused_change());
        assert!(SyncOutcome::Committed.caused_change());
        assert!(SyncOutcome::PushRetried.caused_change());
    }

    #[test]
    fn test_default_commit_message_prefix() {
        let message = default_commit_message();
        assert!(message.starts_with("Update "));
        // Timestamp follows the prefix
        assert!(message.len() > "Update ".len());
    }

    #[test]
    fn test_title_block_capitalizes_and_rules() {
        let block = title_block("my-project");
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(lines[1], "My-project");
        assert_eq!(lines[2], "=".repeat(TITLE_RULE_WIDTH));
    }

    #[tokio::test]
    async fn test_commit_starts_only_after_background_pull() {
        // A slow background pull racing a fast prompt response: the join
        // must complete before any commit work begins
        let pull_done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&pull_done);
        let slow_pull = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
        });

        // Prompt already answered; commit would be next
        join_background_pull(slow_pull).await;
        assert!(
            pull_done.load(Ordering::SeqCst),
            "commit step reached before the background pull completed"
        );
    }

    #[tokio::test]
    async fn test_join_swallows_panicked_pull_task() {
        let handle = tokio::spawn(async {
            panic!("pull exploded");
        });
        // Must not propagate: a failed background pull never aborts the flow
        join_background_pull(handle).await;
    }
}
