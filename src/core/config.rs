//! Configuration constants and environment lookups

use std::path::PathBuf;

// Default concurrency cap to prevent overwhelming the remote host's
// concurrent request limits
pub const GIT_CONCURRENT_CAP: usize = 12;

/// Determines the concurrency limit for the repository fan-out based on CLI
/// args and system resources
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N
/// 3. Smart default → min(CPU_CORES + 2, 12)
pub fn get_git_concurrency(jobs: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = jobs {
        return n.max(1); // Ensure at least 1
    }

    let cpu_count = num_cpus::get();
    (cpu_count + 2).min(GIT_CONCURRENT_CAP)
}

// UI Constants
pub const NO_REPOS_MESSAGE: &str = "No git repositories found.";
pub const EVERYTHING_CLEAN_MESSAGE: &str = "Everything clean.";

// Repository display formatting
pub const TITLE_RULE_WIDTH: usize = 80;

// Directories to skip during repository search
pub const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "build",
    ".next",
    "dist",
    "__pycache__",
    ".venv",
    "venv",
];

// Repository discovery configuration
pub const MAX_SCAN_DEPTH: usize = 10; // Maximum directory depth to scan
pub const ESTIMATED_REPO_COUNT: usize = 50; // Pre-allocation hint for collections

pub const UNKNOWN_REPO_NAME: &str = "unknown";

/// Reads the access token used to authenticate push/pull URLs and the
/// hosting API. An absent token is not fatal here; commands that need it
/// fail individually.
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

/// Resolves the default scan/clone root: `AUTOGIT_ROOT` if set, otherwise
/// `~/scripts`, otherwise the current directory.
pub fn default_root() -> PathBuf {
    if let Ok(root) = std::env::var("AUTOGIT_ROOT") {
        if !root.is_empty() {
            return PathBuf::from(root);
        }
    }
    dirs::home_dir()
        .map(|home| home.join("scripts"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_wins_over_jobs() {
        assert_eq!(get_git_concurrency(Some(8), true), 1);
    }

    #[test]
    fn test_explicit_jobs() {
        assert_eq!(get_git_concurrency(Some(3), false), 3);
        // Zero is clamped to one
        assert_eq!(get_git_concurrency(Some(0), false), 1);
    }

    #[test]
    fn test_default_is_capped() {
        let n = get_git_concurrency(None, false);
        assert!(n >= 1);
        assert!(n <= GIT_CONCURRENT_CAP);
    }
}
