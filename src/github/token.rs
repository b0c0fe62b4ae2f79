//! Personal access token wrapper.

use super::error::ApiError;

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ApiError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ApiError::Client {
                message: "personal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}
