//! Repository-scoped view over a [`GitHubApi`].

use std::fmt;

use crate::context::{ContextError, RunContext};

use super::error::ApiError;
use super::gateway::GitHubApi;
use super::models::{IssueComment, PullRequest, PullRequestState, Repository};

/// Client bound to one `owner/repo` pair.
///
/// Every method forwards to the matching [`GitHubApi`] call with the bound
/// owner and repository filled in.
pub struct ScopedClient<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    owner: String,
    repo: String,
}

impl<A: GitHubApi + ?Sized> fmt::Debug for ScopedClient<'_, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ScopedClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl<'a, A: GitHubApi + ?Sized> ScopedClient<'a, A> {
    /// Binds `api` to `owner/repo`.
    #[must_use]
    pub fn new(api: &'a A, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Binds `api` to the repository the workflow runs in.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when `GITHUB_REPOSITORY` is missing or not of
    /// the form `owner/repo`.
    pub fn from_context(api: &'a A, context: &RunContext) -> Result<Self, ContextError> {
        let (owner, repo) = context.repo()?;
        Ok(Self::new(api, owner, repo))
    }

    /// Bound repository owner.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Bound repository name.
    #[must_use]
    pub const fn repo(&self) -> &str {
        self.repo.as_str()
    }

    /// Lists the repository's pull requests in `state`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn list_pull_requests(
        &self,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, ApiError> {
        self.api
            .list_pull_requests(&self.owner, &self.repo, state)
            .await
    }

    /// Fetches one pull request.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest, ApiError> {
        self.api
            .get_pull_request(&self.owner, &self.repo, number)
            .await
    }

    /// Posts a comment on an issue or pull request.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn create_issue_comment(
        &self,
        issue_number: u64,
        body: &str,
    ) -> Result<IssueComment, ApiError> {
        self.api
            .create_issue_comment(&self.owner, &self.repo, issue_number, body)
            .await
    }

    /// Lists the comments on an issue or pull request.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn list_issue_comments(
        &self,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>, ApiError> {
        self.api
            .list_issue_comments(&self.owner, &self.repo, issue_number)
            .await
    }

    /// Deletes an issue comment.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn delete_issue_comment(&self, comment_id: u64) -> Result<(), ApiError> {
        self.api
            .delete_issue_comment(&self.owner, &self.repo, comment_id)
            .await
    }

    /// Fetches the bound repository.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`ApiError`].
    pub async fn get_repository(&self) -> Result<Repository, ApiError> {
        self.api.get_repository(&self.owner, &self.repo).await
    }
}
