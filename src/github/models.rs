//! Data models returned by the GitHub client.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types.

use serde::Deserialize;

/// Pull request summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Whether the pull request is a draft.
    pub draft: bool,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Source branch name.
    pub head_ref: Option<String>,
    /// Target branch name.
    pub base_ref: Option<String>,
}

/// Issue (or pull request conversation) comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// HTML URL of the comment.
    pub html_url: Option<String>,
}

/// User account details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: u64,
    /// Login name.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Account type (`User`, `Organization`, `Bot`).
    pub kind: Option<String>,
    /// Profile URL.
    pub html_url: Option<String>,
}

/// Organisation details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    /// Organisation identifier.
    pub id: u64,
    /// Login name.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Short description.
    pub description: Option<String>,
}

/// Repository details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    /// Repository identifier.
    pub id: u64,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the repository is archived.
    pub archived: bool,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// HTML URL of the repository.
    pub html_url: Option<String>,
}

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    /// Only open pull requests.
    #[default]
    Open,
    /// Only closed pull requests.
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Account whose repositories are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOwner {
    /// An organisation login.
    Organization(String),
    /// A user login.
    User(String),
}

impl RepositoryOwner {
    /// Login of the owner.
    #[must_use]
    pub const fn login(&self) -> &str {
        match self {
            Self::Organization(login) | Self::User(login) => login.as_str(),
        }
    }

    pub(crate) fn repos_path(&self) -> String {
        match self {
            Self::Organization(login) => format!("/orgs/{login}/repos"),
            Self::User(login) => format!("/users/{login}/repos"),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Organization(login) => format!("organization {login}"),
            Self::User(login) => format!("user {login}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) id: Option<u64>,
    pub(super) login: Option<String>,
    pub(super) name: Option<String>,
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    #[serde(rename = "ref")]
    pub(super) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) draft: Option<bool>,
    pub(super) html_url: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) head: Option<ApiBranch>,
    pub(super) base: Option<ApiBranch>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) body: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiOrganization {
    pub(super) id: u64,
    pub(super) login: String,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) full_name: Option<String>,
    pub(super) private: Option<bool>,
    pub(super) archived: Option<bool>,
    pub(super) default_branch: Option<String>,
    pub(super) html_url: Option<String>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            draft: value.draft.unwrap_or(false),
            html_url: value.html_url,
            author: value.user.and_then(|user| user.login),
            head_ref: value.head.and_then(|branch| branch.name),
            base_ref: value.base.and_then(|branch| branch.name),
        }
    }
}

impl From<ApiComment> for IssueComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
            html_url: value.html_url,
        }
    }
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            id: value.id.unwrap_or_default(),
            login: value.login.unwrap_or_default(),
            name: value.name,
            kind: value.kind,
            html_url: value.html_url,
        }
    }
}

impl From<ApiOrganization> for Organization {
    fn from(value: ApiOrganization) -> Self {
        Self {
            id: value.id,
            login: value.login,
            name: value.name,
            description: value.description,
        }
    }
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id,
            name: value.name,
            full_name: value.full_name,
            private: value.private.unwrap_or(false),
            archived: value.archived.unwrap_or(false),
            default_branch: value.default_branch,
            html_url: value.html_url,
        }
    }
}
