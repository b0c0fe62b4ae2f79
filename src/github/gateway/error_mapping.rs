//! Classification of Octocrab failures.

use http::StatusCode;

use crate::github::error::{ApiError, ApiErrorKind};

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn classify(error: &octocrab::Error) -> ApiErrorKind {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_rate_limit_error(source) {
            ApiErrorKind::RateLimited
        } else if is_auth_failure(source.status_code) {
            ApiErrorKind::Authentication
        } else if source.status_code == StatusCode::NOT_FOUND {
            ApiErrorKind::NotFound
        } else {
            ApiErrorKind::Api
        };
    }

    if is_network_error(error) {
        ApiErrorKind::Network
    } else {
        ApiErrorKind::Api
    }
}

/// Wraps an Octocrab failure with the operation and target it belongs to.
pub(super) fn request_error(
    operation: &'static str,
    target: impl Into<String>,
    error: octocrab::Error,
) -> ApiError {
    let kind = classify(&error);
    let wrapped = ApiError::Request {
        operation,
        target: target.into(),
        kind,
        source: Box::new(error),
    };
    tracing::debug!(error = %wrapped, "GitHub request failed");
    wrapped
}
