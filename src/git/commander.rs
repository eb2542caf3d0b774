//! Per-repository git command gateway
//!
//! Every git invocation for one repository goes through a [`GitCommander`]
//! bound to that repository's folder. Remote-facing commands (push, pull)
//! pass a credential guard that patches the remote URL with an access token
//! so they work non-interactively on hosts without stored credentials.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::core::config::github_token;

/// Commands that talk to the remote and therefore need credentials in place
const REMOTE_COMMANDS: &[&str] = &["pull", "push"];

/// Command gateway bound to exactly one repository folder.
#[derive(Clone)]
pub struct GitCommander {
    folder: PathBuf,
    token: Option<String>,
}

impl GitCommander {
    /// Binds a commander to a repository folder, sourcing the access token
    /// from process configuration.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self::with_token(folder, github_token())
    }

    /// Binds a commander with an explicit token (or none).
    pub fn with_token(folder: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            folder: folder.into(),
            token,
        }
    }

    /// Runs a git command in the repository and returns captured, trimmed
    /// stdout. Non-zero exit surfaces as an error carrying stderr.
    pub async fn query(&self, args: &[&str]) -> Result<String> {
        self.guard_credentials(args).await?;
        let (success, stdout, stderr) = self.run_captured(args).await?;
        if success {
            Ok(stdout)
        } else {
            bail!(
                "git {} failed in {}: {}",
                args.join(" "),
                self.folder.display(),
                stderr
            )
        }
    }

    /// Runs a git command for its side effect with inherited stdio, so the
    /// tool's own output lands on the console.
    pub async fn act(&self, args: &[&str]) -> Result<()> {
        self.guard_credentials(args).await?;
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.folder)
            .status()
            .await
            .with_context(|| format!("failed to spawn git in {}", self.folder.display()))?;
        if status.success() {
            Ok(())
        } else {
            bail!(
                "git {} failed in {}",
                args.join(" "),
                self.folder.display()
            )
        }
    }

    /// Best-effort variant of [`GitCommander::act`]: failure is reported via
    /// the return value only.
    pub async fn act_unchecked(&self, args: &[&str]) -> bool {
        self.act(args).await.is_ok()
    }

    /// Best-effort variant of [`GitCommander::query`]: output is captured
    /// and discarded, failure is reported via the return value only.
    pub async fn query_unchecked(&self, args: &[&str]) -> bool {
        self.query(args).await.is_ok()
    }

    /// Launches a background `pull`. The handle is joined by the caller
    /// before any commit; failure of the pull itself never aborts the
    /// caller's flow. Output is captured, not printed: console printing
    /// happens only under the caller's output lock.
    pub fn spawn_pull(&self) -> JoinHandle<()> {
        let commander = self.clone();
        tokio::spawn(async move {
            commander.query_unchecked(&["pull"]).await;
        })
    }

    /// Ensures the remote URL carries authentication before a push or pull.
    /// Idempotent: once the URL embeds a token this is a no-op, as it is for
    /// non-https remotes. Errors only when a rewrite is needed and no token
    /// is configured.
    pub async fn ensure_remote_credentials(&self) -> Result<()> {
        let (success, url, _) = self.run_captured(&["config", "remote.origin.url"]).await?;
        if !success || url.is_empty() {
            // No remote configured; let the triggering command report it
            return Ok(());
        }

        if !needs_auth(&url) {
            return Ok(());
        }

        let Some(token) = self.token.as_deref() else {
            bail!(
                "remote {} needs authentication but no access token is configured (set GITHUB_TOKEN)",
                url
            )
        };
        let patched = embed_token(&url, token);

        let (success, _, stderr) = self
            .run_captured(&["config", "remote.origin.url", &patched])
            .await?;
        if success {
            Ok(())
        } else {
            bail!(
                "failed to persist authenticated remote URL in {}: {}",
                self.folder.display(),
                stderr
            )
        }
    }

    async fn guard_credentials(&self, args: &[&str]) -> Result<()> {
        if args.first().is_some_and(|cmd| REMOTE_COMMANDS.contains(cmd)) {
            self.ensure_remote_credentials().await?;
        }
        Ok(())
    }

    async fn run_captured(&self, args: &[&str]) -> Result<(bool, String, String)> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.folder)
            .output()
            .await
            .with_context(|| format!("failed to spawn git in {}", self.folder.display()))?;
        Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

/// True when the URL is https without embedded authentication.
fn needs_auth(url: &str) -> bool {
    url.starts_with("https://") && !url.contains('@')
}

/// Rewrites an https remote URL to embed the token.
fn embed_token(url: &str, token: &str) -> String {
    url.replacen("https://", &format!("https://{token}@"), 1)
}
