pub mod client;
pub mod models;

pub use client::{extract_github_username, GitHubClient, GitHubError};
pub use models::*;
