//! Hosting-provider API client
//!
//! Thin wrapper over the GitHub REST API used by the clone/install
//! convenience commands: resolve the current login, list the account's own
//! repositories, and build authenticated clone URLs.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("autogit/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 10;

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Deserialize)]
struct ApiRepo {
    name: String,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    fork: bool,
}

pub struct GithubClient {
    token: String,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn new(token: String) -> Self {
        Self {
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Builds a client from process configuration.
    pub fn from_env() -> Result<Self> {
        let token = crate::core::config::github_token()
            .context("no access token configured (set GITHUB_TOKEN)")?;
        Ok(Self::new(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !response.status().is_success() {
            bail!("GitHub API {} returned {}", url, response.status());
        }
        Ok(response.json().await?)
    }

    /// Login name of the token's user.
    pub async fn current_login(&self) -> Result<String> {
        let user: ApiUser = self.get_json(&format!("{API_BASE}/user")).await?;
        Ok(user.login)
    }

    /// Names of repositories owned by the current user, with archived
    /// repositories and forks filtered out.
    pub async fn owned_repo_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for page in 1..=MAX_PAGES {
            let url = format!(
                "{API_BASE}/user/repos?affiliation=owner&per_page={PER_PAGE}&page={page}"
            );
            let repos: Vec<ApiRepo> = self.get_json(&url).await?;
            let last_page = repos.len() < PER_PAGE;
            names.extend(
                repos
                    .into_iter()
                    .filter(|repo| !repo.archived && !repo.fork)
                    .map(|repo| repo.name),
            );
            if last_page {
                break;
            }
        }
        Ok(names)
    }

    /// Clone URL carrying the token, so clones work non-interactively.
    pub fn clone_url(&self, login: &str, name: &str) -> String {
        format!("https://{}@github.com/{}/{}", self.token, login, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_url_embeds_token() {
        let client = GithubClient::new("tok".to_string());
        assert_eq!(
            client.clone_url("someone", "project"),
            "https://tok@github.com/someone/project"
        );
    }

    #[test]
    fn test_api_repo_defaults() {
        let repo: ApiRepo = serde_json::from_str(r#"{"name": "thing"}"#).unwrap();
        assert_eq!(repo.name, "thing");
        assert!(!repo.archived);
        assert!(!repo.fork);
    }
}
