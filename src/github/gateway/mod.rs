//! Gateway for the GitHub REST calls this crate wraps.
//!
//! [`GitHubApi`] is the seam between the helpers built on top of it (scoped
//! client, repository page streams) and the Octocrab-backed
//! [`GitHubClient`], so those helpers can be exercised with a mock.

mod client;
mod error_mapping;
mod rest;

pub use rest::GitHubClient;

use async_trait::async_trait;

use crate::github::error::ApiError;
use crate::github::models::{
    IssueComment, Organization, PullRequest, PullRequestState, Repository, RepositoryOwner, User,
};

/// One-to-one wrappers over GitHub REST endpoints.
///
/// Every method issues the request(s) for one operation and wraps any
/// failure in [`ApiError::Request`] naming the operation and its target.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists every pull request in `state`, following all pages.
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, ApiError>;

    /// Fetches one pull request.
    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, ApiError>;

    /// Posts a comment on an issue or pull request.
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<IssueComment, ApiError>;

    /// Lists every comment on an issue or pull request.
    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>, ApiError>;

    /// Deletes an issue comment.
    async fn delete_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> Result<(), ApiError>;

    /// Fetches a user by login.
    async fn get_user(&self, login: &str) -> Result<User, ApiError>;

    /// Fetches the user the token belongs to.
    async fn get_authenticated_user(&self) -> Result<User, ApiError>;

    /// Fetches an organisation by login.
    async fn get_organization(&self, org: &str) -> Result<Organization, ApiError>;

    /// Fetches repository details.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, ApiError>;

    /// Fetches one page of the owner's repositories (1-based `page`).
    async fn repository_page(
        &self,
        owner: &RepositoryOwner,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Repository>, ApiError>;
}
