pub mod config;
pub mod discovery;
pub mod stats;
pub mod sync;

// Re-export key items at module level for convenience
pub use config::{default_root, get_git_concurrency, github_token};
pub use discovery::find_repos;
pub use stats::SyncStatistics;
