//! Clone and install convenience commands
//!
//! Thin wrappers around `git clone` and `pip install` driven by the hosting
//! API: clone repositories into the default root, or install them as
//! packages and drop the local working copy.

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::core::config::default_root;
use crate::github::GithubClient;
use crate::ui::{spinner, stdin_prompt, Answer};

/// Clones the named repositories into the default root. With no names,
/// fetches the account's repository list and offers a chooser.
pub async fn handle_clone_command(names: Vec<String>) -> Result<()> {
    let client = GithubClient::from_env()?;
    let login = client.current_login().await?;

    let names = if names.is_empty() {
        let fetching = spinner("Fetching repository list");
        let repos = client.owned_repo_names().await;
        fetching.finish_and_clear();
        match choose_repo(&repos?).await? {
            Some(name) => vec![name],
            None => return Ok(()),
        }
    } else {
        names
    };

    let root = default_root();
    for name in names {
        let folder = root.join(&name);
        if folder.exists() {
            println!("{name} already cloned");
            continue;
        }
        let url = client.clone_url(&login, &name);
        let status = Command::new("git")
            .arg("clone")
            .arg(&url)
            .arg(&folder)
            .status()
            .await
            .context("failed to spawn git clone")?;
        if !status.success() {
            eprintln!("🔴 {name}  clone failed");
        }
    }
    Ok(())
}

/// Numbered chooser over the account's repository names.
async fn choose_repo(repos: &[String]) -> Result<Option<String>> {
    if repos.is_empty() {
        println!("No repositories available.");
        return Ok(None);
    }
    for (index, name) in repos.iter().enumerate() {
        println!("{:3}  {name}", index + 1);
    }

    let prompt = stdin_prompt();
    let answer = prompt("Choose repo (number or name):".to_string()).await?;
    let choice = match answer {
        Answer::Text(text) => {
            if let Ok(index) = text.parse::<usize>() {
                repos.get(index.wrapping_sub(1)).cloned()
            } else if repos.contains(&text) {
                Some(text)
            } else {
                None
            }
        }
        _ => None,
    };
    Ok(choice)
}

/// Installs the named repositories as Python packages from their hosted
/// source, then removes the corresponding local working copy.
pub async fn handle_install_command(names: Vec<String>) -> Result<()> {
    let client = GithubClient::from_env()?;
    let login = client.current_login().await?;
    let root = default_root();

    for name in &names {
        let url = format!("git+{}", client.clone_url(&login, name));
        let status = Command::new("pip")
            .args(["install", "--force-reinstall", "--no-deps", &url])
            .status()
            .await
            .context("failed to spawn pip")?;
        if !status.success() {
            eprintln!("🔴 {name}  install failed");
            continue;
        }

        // The installed package replaces the working copy
        let folder = root.join(name);
        if folder.exists() {
            let _ = tokio::fs::remove_dir_all(&folder).await;
        }
    }
    Ok(())
}
