//! GitHub REST access for actions.
//!
//! [`GitHubClient`] wraps Octocrab and implements [`GitHubApi`], one method
//! per endpoint. [`ScopedClient`] binds a client to one repository and
//! [`repository_pages`] walks an owner's repositories lazily. Every failed
//! call is reported as an [`ApiError`] naming the operation, its target and a
//! coarse [`ApiErrorKind`].

pub mod error;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod scoped;
pub mod token;

pub use error::{ApiError, ApiErrorKind};
pub use gateway::{GitHubApi, GitHubClient};
pub use models::{
    IssueComment, Organization, PullRequest, PullRequestState, Repository, RepositoryOwner, User,
};
pub use pagination::{REPOSITORY_PAGE_SIZE, list_repositories, repository_pages};
pub use scoped::ScopedClient;
pub use token::PersonalAccessToken;

#[cfg(test)]
pub use gateway::MockGitHubApi;

#[cfg(test)]
mod tests;
