//! Octocrab implementation of the GitHub gateway.

use std::fmt;

use async_trait::async_trait;
use futures::Stream;
use octocrab::models::CommentId;
use octocrab::{Octocrab, Page};
use serde_json::json;

use crate::config::ActionConfig;
use crate::github::error::ApiError;
use crate::github::models::{
    ApiComment, ApiOrganization, ApiPullRequest, ApiRepository, ApiUser, IssueComment,
    Organization, PullRequest, PullRequestState, Repository, RepositoryOwner, User,
};
use crate::github::pagination;
use crate::github::scoped::ScopedClient;
use crate::github::token::PersonalAccessToken;

use super::GitHubApi;
use super::client::build_octocrab_client;
use super::error_mapping::request_error;

const LIST_PAGE_SIZE: &str = "100";

/// Octocrab-backed GitHub client.
pub struct GitHubClient {
    client: Octocrab,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("GitHubClient").finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Wraps an existing Octocrab client.
    #[must_use]
    pub const fn from_octocrab(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a client for `token` against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when the base URL is invalid or Octocrab
    /// fails to construct a client.
    pub fn new(token: &PersonalAccessToken, api_base: &str) -> Result<Self, ApiError> {
        build_octocrab_client(token, api_base).map(Self::from_octocrab)
    }

    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when no token is configured or the client
    /// cannot be built.
    pub fn from_config(config: &ActionConfig) -> Result<Self, ApiError> {
        let token_value = config.resolve_token().map_err(|error| ApiError::Client {
            message: error.to_string(),
        })?;
        let token = PersonalAccessToken::new(token_value)?;
        Self::new(&token, config.api_base())
    }

    /// Client bound to one repository.
    #[must_use]
    pub fn scoped(
        &self,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> ScopedClient<'_, Self> {
        ScopedClient::new(self, owner, repo)
    }

    /// Lazily streams the owner's repositories, one page per item.
    pub fn repository_pages<'a>(
        &'a self,
        owner: &'a RepositoryOwner,
    ) -> impl Stream<Item = Result<Vec<Repository>, ApiError>> + Send + 'a {
        pagination::repository_pages(self, owner)
    }

    /// Fetches every repository the owner has.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] raised while paging.
    pub async fn list_repositories(
        &self,
        owner: &RepositoryOwner,
    ) -> Result<Vec<Repository>, ApiError> {
        pagination::list_repositories(self, owner).await
    }
}

fn repo_target(owner: &str, repo: &str) -> String {
    format!("{owner}/{repo}")
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, ApiError> {
        const OPERATION: &str = "list pull requests";
        let query = [("state", state.as_str()), ("per_page", LIST_PAGE_SIZE)];
        let first: Page<ApiPullRequest> = self
            .client
            .get(format!("/repos/{owner}/{repo}/pulls"), Some(&query))
            .await
            .map_err(|error| request_error(OPERATION, repo_target(owner, repo), error))?;

        self.client
            .all_pages(first)
            .await
            .map(|pulls| pulls.into_iter().map(ApiPullRequest::into).collect())
            .map_err(|error| request_error(OPERATION, repo_target(owner, repo), error))
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, ApiError> {
        self.client
            .get::<ApiPullRequest, _, _>(
                format!("/repos/{owner}/{repo}/pulls/{number}"),
                None::<&()>,
            )
            .await
            .map(ApiPullRequest::into)
            .map_err(|error| {
                request_error("get pull request", format!("{owner}/{repo}#{number}"), error)
            })
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<IssueComment, ApiError> {
        let payload = json!({ "body": body });
        let created: ApiComment = self
            .client
            .post(
                format!("/repos/{owner}/{repo}/issues/{issue_number}/comments"),
                Some(&payload),
            )
            .await
            .map_err(|error| {
                request_error(
                    "create issue comment",
                    format!("{owner}/{repo}#{issue_number}"),
                    error,
                )
            })?;
        Ok(created.into())
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>, ApiError> {
        const OPERATION: &str = "list issue comments";
        let target = || format!("{owner}/{repo}#{issue_number}");
        let query = [("per_page", LIST_PAGE_SIZE)];
        let first: Page<ApiComment> = self
            .client
            .get(
                format!("/repos/{owner}/{repo}/issues/{issue_number}/comments"),
                Some(&query),
            )
            .await
            .map_err(|error| request_error(OPERATION, target(), error))?;

        self.client
            .all_pages(first)
            .await
            .map(|comments| comments.into_iter().map(ApiComment::into).collect())
            .map_err(|error| request_error(OPERATION, target(), error))
    }

    async fn delete_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> Result<(), ApiError> {
        self.client
            .issues(owner, repo)
            .delete_comment(CommentId(comment_id))
            .await
            .map_err(|error| {
                request_error(
                    "delete issue comment",
                    format!("comment {comment_id} in {owner}/{repo}"),
                    error,
                )
            })
    }

    async fn get_user(&self, login: &str) -> Result<User, ApiError> {
        self.client
            .get::<ApiUser, _, _>(format!("/users/{login}"), None::<&()>)
            .await
            .map(ApiUser::into)
            .map_err(|error| request_error("get user", format!("user {login}"), error))
    }

    async fn get_authenticated_user(&self) -> Result<User, ApiError> {
        self.client
            .get::<ApiUser, _, _>("/user", None::<&()>)
            .await
            .map(ApiUser::into)
            .map_err(|error| request_error("get authenticated user", "the token owner", error))
    }

    async fn get_organization(&self, org: &str) -> Result<Organization, ApiError> {
        self.client
            .get::<ApiOrganization, _, _>(format!("/orgs/{org}"), None::<&()>)
            .await
            .map(ApiOrganization::into)
            .map_err(|error| {
                request_error("get organization", format!("organization {org}"), error)
            })
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, ApiError> {
        self.client
            .get::<ApiRepository, _, _>(format!("/repos/{owner}/{repo}"), None::<&()>)
            .await
            .map(ApiRepository::into)
            .map_err(|error| request_error("get repository", repo_target(owner, repo), error))
    }

    async fn repository_page(
        &self,
        owner: &RepositoryOwner,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Repository>, ApiError> {
        let page_str = page.to_string();
        let per_page_str = per_page.to_string();
        let query = [
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];
        tracing::debug!(owner = owner.login(), page, "fetching repository page");
        self.client
            .get::<Vec<ApiRepository>, _, _>(owner.repos_path(), Some(&query))
            .await
            .map(|repos| repos.into_iter().map(ApiRepository::into).collect())
            .map_err(|error| {
                request_error(
                    "list repositories",
                    format!("{} (page {page})", owner.describe()),
                    error,
                )
            })
    }
}
