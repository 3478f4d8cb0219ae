use async_trait::async_trait;

use crate::github::{GitHubClient, GitHubError, RepositoryRecord};

/// Where the projects page gets its live repository list from.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Strict listing: every failure is reported, the caller decides the policy.
    async fn list_user_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, GitHubError>;
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_user_repos(&self, username: &str) -> Result<Vec<RepositoryRecord>, GitHubError> {
        GitHubClient::list_user_repos(self, username).await
    }
}
