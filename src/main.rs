//! autogit: keep a tree of git repositories committed, pushed and pulled

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use autogit::commands;

#[derive(Parser)]
#[command(
    name = "autogit",
    version,
    about = "Keep a tree of git repositories committed, pushed and pulled"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect every repository and drive commit/push/pull decisions
    Sync {
        /// Root directories to scan (default: AUTOGIT_ROOT or ~/scripts)
        roots: Vec<PathBuf>,
        /// Pull every repository instead of committing local work
        #[arg(long)]
        pull: bool,
        /// Number of repositories processed concurrently
        #[arg(long)]
        jobs: Option<usize>,
        /// Process repositories one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Clone repositories from the hosting account into the default root
    Clone {
        /// Repository names; empty opens a chooser
        names: Vec<String>,
    },
    /// Install repositories as packages and drop the working copies
    Install {
        /// Repository names
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Sync {
        roots: Vec::new(),
        pull: false,
        jobs: None,
        sequential: false,
    }) {
        Commands::Sync {
            roots,
            pull,
            jobs,
            sequential,
        } => commands::sync::handle_sync_command(roots, pull, jobs, sequential).await,
        Commands::Clone { names } => commands::clone::handle_clone_command(names).await,
        Commands::Install { names } => commands::clone::handle_install_command(names).await,
    }
}
