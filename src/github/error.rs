//! Error types exposed by the GitHub client.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Broad classification of a failed GitHub call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// GitHub rejected the credentials (401/403).
    Authentication,
    /// The API rate limit was exceeded.
    RateLimited,
    /// The resource does not exist or is hidden from the token.
    NotFound,
    /// Transport-level failure.
    Network,
    /// Any other API failure.
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Authentication => "authentication failed",
            Self::RateLimited => "rate limit exceeded",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Api => "API error",
        })
    }
}

/// Errors surfaced by [`GitHubClient`](super::GitHubClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client could not be constructed.
    #[error("failed to build GitHub client: {message}")]
    Client {
        /// Construction failure detail.
        message: String,
    },

    /// A remote call failed.
    #[error("{operation} failed for {target}: {kind}")]
    Request {
        /// Operation name, e.g. `list pull requests`.
        operation: &'static str,
        /// Target of the call, e.g. `octo/repo#4`.
        target: String,
        /// Classification of the failure.
        kind: ApiErrorKind,
        /// Error reported by Octocrab.
        #[source]
        source: Box<octocrab::Error>,
    },
}

impl ApiError {
    /// Returns the failure classification for request errors.
    #[must_use]
    pub const fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Client { .. } => None,
            Self::Request { kind, .. } => Some(*kind),
        }
    }

    /// Returns the HTTP status GitHub answered with, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { source, .. } => match source.as_ref() {
                octocrab::Error::GitHub { source: github, .. } => Some(github.status_code),
                _ => None,
            },
            Self::Client { .. } => None,
        }
    }
}
