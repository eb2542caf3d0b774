//! Repository synchronization command
//!
//! Discovers repositories under the requested roots, fans the sync worker
//! out across them, and drives the optional repeat-until-clean pull loop.

use anyhow::Result;
use std::path::PathBuf;

use crate::core::config::{
    default_root, get_git_concurrency, EVERYTHING_CLEAN_MESSAGE, NO_REPOS_MESSAGE,
};
use crate::core::find_repos;
use crate::core::sync::run_pass;
use crate::ui::{stdin_prompt, Answer};
use crate::utils::{set_terminal_title, set_terminal_title_and_flush};

/// Handles the sync command in commit mode or pull mode.
pub async fn handle_sync_command(
    roots: Vec<PathBuf>,
    do_pull: bool,
    jobs: Option<usize>,
    sequential: bool,
) -> Result<()> {
    set_terminal_title("🚀 autogit");

    let roots = if roots.is_empty() {
        vec![default_root()]
    } else {
        roots
    };
    let concurrency = get_git_concurrency(jobs, sequential);
    let prompt = stdin_prompt();

    let repos = discover(&roots).await;
    if repos.is_empty() {
        println!("{NO_REPOS_MESSAGE}");
        set_terminal_title_and_flush("✅ autogit");
        return Ok(());
    }

    let changed = run_pass(&repos, do_pull, concurrency, prompt.clone()).await;

    if do_pull {
        // Pull mode is a single pass
        if !changed {
            println!("{EVERYTHING_CLEAN_MESSAGE}");
        }
    } else if !changed {
        // Nothing changed anywhere: offer to exit, or switch to pull mode
        // and re-run the whole discovery+fan-out cycle until something
        // changes or the user exits
        loop {
            let answer = prompt(format!("{EVERYTHING_CLEAN_MESSAGE} Exit?")).await?;
            let wants_pull = matches!(answer, Answer::No)
                || matches!(&answer, Answer::Text(text) if text == "pull");
            if !wants_pull {
                break;
            }

            println!("Pulling..");
            let repos = discover(&roots).await;
            if run_pass(&repos, true, concurrency, prompt.clone()).await {
                break;
            }
        }
    }

    set_terminal_title_and_flush("✅ autogit");
    Ok(())
}

/// Runs discovery off the async runtime; a failed scan degrades to an empty
/// set rather than crashing the run.
async fn discover(roots: &[PathBuf]) -> Vec<(String, PathBuf)> {
    let roots = roots.to_vec();
    tokio::task::spawn_blocking(move || find_repos(&roots))
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error in repository discovery: {e}");
            Vec::new()
        })
}
