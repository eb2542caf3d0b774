//! # autogit
//!
//! `autogit` keeps a tree of local git repositories synchronized with their
//! remotes with minimal attention. It powers the `autogit` CLI tool.
//!
//! ## Core Features
//!
//! - **Fast Discovery**: parallel repository scanning that never descends
//!   into a repository it already found.
//! - **Concurrent Sync**: every repository is inspected at once; console
//!   output stays coherent because each repository's report-and-decide block
//!   is serialized.
//! - **Interactive Decisions**: stage, commit with a default or custom
//!   message, push, or skip — per repository.
//! - **Credential Guard**: push/pull URLs are patched with an access token
//!   so remote operations work non-interactively.
//!
//! ## Example
//!
//! ```rust,no_run
//! use autogit::core::find_repos;
//! use std::path::PathBuf;
//!
//! let repos = find_repos(&[PathBuf::from(".")]);
//! for (name, path) in repos {
//!     println!("{}: {}", name, path.display());
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod github;
pub mod ui;
pub mod utils;
