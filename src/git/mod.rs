pub mod commander;
pub mod status;

// Re-export commonly used items
pub use commander::GitCommander;
pub use status::{branch_header_is_ahead, compact_status, RepoStatus, UP_TO_DATE_SENTINEL};
