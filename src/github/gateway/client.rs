//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::ApiError;
use crate::github::token::PersonalAccessToken;

fn invalid_base(api_base: &str, detail: impl std::fmt::Display) -> ApiError {
    ApiError::Client {
        message: format!("invalid API base URL {api_base:?}: {detail}"),
    }
}

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns [`ApiError::Client`] when the base URL is not an absolute HTTP(S)
/// URL or Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ApiError> {
    let parsed = Url::parse(api_base).map_err(|error| invalid_base(api_base, error))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid_base(api_base, "scheme must be http or https"));
    }

    let base_uri: Uri = api_base
        .trim_end_matches('/')
        .parse::<Uri>()
        .map_err(|error| invalid_base(api_base, error))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| invalid_base(api_base, error))?
        .build()
        .map_err(|error| ApiError::Client {
            message: error.to_string(),
        })
}
