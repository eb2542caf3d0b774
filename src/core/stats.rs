//! Statistics for one synchronization pass

use std::time::Duration;

use super::sync::SyncOutcome;

/// Counters aggregated across all repositories in one pass.
#[derive(Clone, Default)]
pub struct SyncStatistics {
    pub clean_repos: u32,
    pub pulled_repos: u32,
    pub committed_repos: u32,
    pub push_retried_repos: u32,
    pub skipped_repos: u32,
    pub failed_repos: Vec<(String, String)>, // (repo_name, error_message)
}

impl SyncStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one repository's outcome.
    pub fn update(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Clean => self.clean_repos += 1,
            SyncOutcome::PulledUpdate => self.pulled_repos += 1,
            SyncOutcome::Committed => self.committed_repos += 1,
            SyncOutcome::PushRetried => self.push_retried_repos += 1,
            SyncOutcome::Skipped => self.skipped_repos += 1,
        }
    }

    /// Records one repository's failure without aborting its siblings.
    pub fn record_failure(&mut self, repo_name: &str, error: &str) {
        self.failed_repos
            .push((repo_name.to_string(), clean_error_message(error)));
    }

    /// One-line summary printed after the pass.
    pub fn generate_summary(&self, duration: Duration) -> String {
        let mut parts = vec![format!("✅ Completed in {:.1}s", duration.as_secs_f64())];
        if self.committed_repos > 0 {
            parts.push(format!("{} committed", self.committed_repos));
        }
        if self.pulled_repos > 0 {
            parts.push(format!("{} pulled", self.pulled_repos));
        }
        if self.push_retried_repos > 0 {
            parts.push(format!("{} pushed", self.push_retried_repos));
        }
        if self.skipped_repos > 0 {
            parts.push(format!("{} skipped", self.skipped_repos));
        }
        parts.push(format!("{} clean", self.clean_repos));
        if !self.failed_repos.is_empty() {
            parts.push(format!("{} failed", self.failed_repos.len()));
        }
        parts.join(" • ")
    }
}

// Display formatting limits for error lines
const ERROR_MESSAGE_MAX_LENGTH: usize = 120;
const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 117;

/// Collapses a multi-line git error into a single display line.
pub fn clean_error_message(error: &str) -> String {
    let cleaned = error.replace(['\n', '\t'], " ").replace('\r', "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.len() > ERROR_MESSAGE_MAX_LENGTH {
        format!("{}...", &cleaned[..ERROR_MESSAGE_TRUNCATE_LENGTH])
    } else {
        cleaned
    }
}
