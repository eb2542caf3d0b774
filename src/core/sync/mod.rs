//! Concurrent multi-repository synchronization engine

pub mod orchestrator;
pub mod worker;

pub use orchestrator::run_pass;
pub use worker::{
    default_commit_message, join_background_pull, sync_repository, SyncOutcome, WorkerContext,
};
