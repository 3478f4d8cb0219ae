use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{error, info, warn};

use super::models::RepositoryRecord;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub user not found: {0}")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("GitHub API error ({status})")]
    UnexpectedStatus { status: StatusCode },

    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected GitHub response: {0}")]
    Malformed(String),
}

/// Read-only client for public GitHub repository listings.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// List a user's public, non-fork repositories, newest update first.
    ///
    /// Every failure mode is reported as a distinct [`GitHubError`]. A blank
    /// username yields an empty list without touching the network.
    pub async fn list_user_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, GitHubError> {
        let username = username.trim();
        if username.is_empty() {
            warn!("Invalid GitHub username provided");
            return Ok(Vec::new());
        }

        let url = self.user_repos_url(username)?;
        info!("Fetching GitHub repos for: {}", username);

        let mut request = self
            .client
            .get(url)
            .query(&[("sort", "updated"), ("per_page", "100")])
            .header("User-Agent", "portfolio-site")
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(GitHubError::NotFound(username.to_string())),
            StatusCode::FORBIDDEN => return Err(GitHubError::RateLimited),
            status if !status.is_success() => return Err(GitHubError::UnexpectedStatus { status }),
            _ => {}
        }

        let body: serde_json::Value = response.json().await?;
        let items = match body {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(GitHubError::Malformed(format!(
                    "expected array of repos but received {}",
                    json_kind(&other)
                )))
            }
        };

        let fetched = items.len();
        let mut repos: Vec<RepositoryRecord> = items
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| match serde_json::from_value(item) {
                Ok(repo) => Some(repo),
                Err(e) => {
                    warn!("Skipping unreadable repo entry #{}: {}", position, e);
                    None
                }
            })
            .collect();

        repos.retain(|repo| !repo.fork);
        repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        info!(
            "Successfully fetched {} repos for {} ({} after removing forks)",
            fetched,
            username,
            repos.len()
        );
        Ok(repos)
    }

    /// `{base}/users/{username}/repos`, with the username percent-encoded as
    /// a single path segment.
    fn user_repos_url(&self, username: &str) -> Result<Url, GitHubError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GitHubError::Malformed(format!("invalid API base {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| GitHubError::Malformed(format!("invalid API base {}", self.base_url)))?
            .pop_if_empty()
            .push("users")
            .push(username)
            .push("repos");
        Ok(url)
    }

    /// Repository listing that only fails on an unexpected HTTP status.
    ///
    /// Missing users, rate limiting, malformed bodies and transport errors
    /// are logged and come back as an empty list.
    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, GitHubError> {
        match self.list_user_repos(username).await {
            Ok(repos) => Ok(repos),
            Err(e @ GitHubError::UnexpectedStatus { .. }) => Err(e),
            Err(e) => {
                error!("Error fetching GitHub repos: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Username from a profile URL such as `https://github.com/someone`.
/// Returns an empty string when the URL has no github.com path segment.
pub fn extract_github_username(github_url: &str) -> String {
    github_url
        .split_once("github.com/")
        .and_then(|(_, rest)| {
            rest.split(|c: char| c == '/' || c.is_whitespace())
                .next()
                .filter(|segment| !segment.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_default()
}
