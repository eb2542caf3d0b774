//! Commander and credential-guard tests against real git repositories.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use autogit::git::GitCommander;

fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(temp: &TempDir) -> &Path {
    let path = temp.path();
    git(path, &["init", "-q"]);
    path
}

#[tokio::test]
async fn test_query_captures_trimmed_stdout() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    let commander = GitCommander::with_token(path, None);
    let inside = commander
        .query(&["rev-parse", "--is-inside-work-tree"])
        .await
        .unwrap();
    assert_eq!(inside, "true");
}

#[tokio::test]
async fn test_query_failure_carries_stderr() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    let commander = GitCommander::with_token(path, None);
    let err = commander
        .query(&["rev-parse", "--verify", "no-such-ref"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("rev-parse"));
}

#[tokio::test]
async fn test_act_unchecked_suppresses_failure() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    let commander = GitCommander::with_token(path, None);
    assert!(!commander.act_unchecked(&["no-such-subcommand"]).await);
    assert!(commander.act_unchecked(&["status", "-s"]).await);
}

#[tokio::test]
async fn test_query_unchecked_reports_success_only() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    let commander = GitCommander::with_token(path, None);
    assert!(
        commander
            .query_unchecked(&["rev-parse", "--is-inside-work-tree"])
            .await
    );
    assert!(
        !commander
            .query_unchecked(&["rev-parse", "--verify", "no-such-ref"])
            .await
    );
}

#[tokio::test]
async fn test_spawn_pull_failure_joins_cleanly() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    // No remote configured: the pull fails, the task still joins without
    // panicking
    let commander = GitCommander::with_token(path, None);
    commander.spawn_pull().await.unwrap();
}

#[tokio::test]
async fn test_credential_guard_rewrites_bare_https_remote() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);
    git(
        path,
        &["remote", "add", "origin", "https://github.com/user/repo.git"],
    );

    let commander = GitCommander::with_token(path, Some("tok".to_string()));
    commander.ensure_remote_credentials().await.unwrap();
    assert_eq!(
        git(path, &["config", "remote.origin.url"]),
        "https://tok@github.com/user/repo.git"
    );
}

#[tokio::test]
async fn test_credential_guard_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);
    git(
        path,
        &["remote", "add", "origin", "https://github.com/user/repo.git"],
    );

    let commander = GitCommander::with_token(path, Some("tok".to_string()));
    commander.ensure_remote_credentials().await.unwrap();
    let once = git(path, &["config", "remote.origin.url"]);
    commander.ensure_remote_credentials().await.unwrap();
    let twice = git(path, &["config", "remote.origin.url"]);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_credential_guard_leaves_ssh_remote_alone() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);
    git(
        path,
        &["remote", "add", "origin", "git@github.com:user/repo.git"],
    );

    // No token needed: nothing to rewrite
    let commander = GitCommander::with_token(path, None);
    commander.ensure_remote_credentials().await.unwrap();
    assert_eq!(
        git(path, &["config", "remote.origin.url"]),
        "git@github.com:user/repo.git"
    );
}

#[tokio::test]
async fn test_credential_guard_fails_without_token() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);
    git(
        path,
        &["remote", "add", "origin", "https://github.com/user/repo.git"],
    );

    let commander = GitCommander::with_token(path, None);
    let err = commander.ensure_remote_credentials().await.unwrap_err();
    assert!(err.to_string().contains("no access token"));
    // The URL is left untouched on failure
    assert_eq!(
        git(path, &["config", "remote.origin.url"]),
        "https://github.com/user/repo.git"
    );
}

#[tokio::test]
async fn test_guard_is_a_noop_without_a_remote() {
    let temp = TempDir::new().unwrap();
    let path = init_repo(&temp);

    // The triggering command reports the missing remote, not the guard
    let commander = GitCommander::with_token(path, None);
    commander.ensure_remote_credentials().await.unwrap();
}
