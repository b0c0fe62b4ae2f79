//! Error types raised while resolving action inputs.

use thiserror::Error;

/// Boxed error returned by a default value provider.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Failures produced by a single input validator.
#[derive(Debug, Error)]
pub enum InputError {
    /// A required input had no value and no default.
    #[error("input is required and was not supplied")]
    Missing,

    /// A boolean input carried something other than `true` or `false`.
    #[error("invalid boolean value {value:?}: expected \"true\" or \"false\"")]
    InvalidBoolean {
        /// Raw value read from the environment.
        value: String,
    },

    /// A string input carried a value outside its declared choices.
    #[error("invalid value {value:?}: expected one of {}", .choices.join(", "))]
    InvalidChoice {
        /// Raw value read from the environment.
        value: String,
        /// Allowed values in declaration order.
        choices: Vec<String>,
    },

    /// A lazily computed default failed.
    #[error("default value provider failed")]
    DefaultProvider {
        /// Error returned by the provider.
        #[source]
        source: ProviderError,
    },
}

/// Wraps an [`InputError`] with the field and environment key it came from.
#[derive(Debug, Error)]
#[error("failed to resolve input `{field}` from {key}")]
pub struct InputResolutionError {
    /// Result field name declared in the schema.
    pub field: String,
    /// Environment variable consulted for the raw value.
    pub key: String,
    /// Underlying validation failure.
    #[source]
    pub source: InputError,
}
