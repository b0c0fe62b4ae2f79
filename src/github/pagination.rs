//! Lazy paging over an owner's repositories.
//!
//! [`repository_pages`] yields one `Vec<Repository>` per API page and stops at
//! the first empty page. Nothing is requested until the stream is polled, and
//! every call starts again from page one.
//!
//! # Example
//!
//! ```no_run
//! use actionkit::github::{GitHubClient, PersonalAccessToken, RepositoryOwner, list_repositories};
//!
//! # async fn demo() -> Result<(), actionkit::github::ApiError> {
//! let token = PersonalAccessToken::new("ghp_example")?;
//! let client = GitHubClient::new(&token, "https://api.github.com")?;
//! let owner = RepositoryOwner::Organization("octo-org".to_owned());
//! let repos = list_repositories(&client, &owner).await?;
//! println!("{} repositories", repos.len());
//! # Ok(())
//! # }
//! ```

use futures::{Stream, TryStreamExt, stream};

use super::error::ApiError;
use super::gateway::GitHubApi;
use super::models::{Repository, RepositoryOwner};

/// Number of repositories requested per page.
pub const REPOSITORY_PAGE_SIZE: u8 = 100;

/// Streams the owner's repositories one page at a time.
///
/// The stream ends after the first empty page or the first error.
pub fn repository_pages<'a, A>(
    api: &'a A,
    owner: &'a RepositoryOwner,
) -> impl Stream<Item = Result<Vec<Repository>, ApiError>> + Send + 'a
where
    A: GitHubApi + ?Sized,
{
    stream::try_unfold(Some(1_u32), move |next| async move {
        let Some(page) = next else {
            return Ok(None);
        };
        let repos = api
            .repository_page(owner, page, REPOSITORY_PAGE_SIZE)
            .await?;
        if repos.is_empty() {
            return Ok(None);
        }
        Ok(Some((repos, page.checked_add(1))))
    })
}

/// Collects every repository the owner has, in page order.
///
/// # Errors
///
/// Returns the first [`ApiError`] raised while fetching a page.
pub async fn list_repositories<A>(
    api: &A,
    owner: &RepositoryOwner,
) -> Result<Vec<Repository>, ApiError>
where
    A: GitHubApi + ?Sized,
{
    repository_pages(api, owner).try_concat().await
}
