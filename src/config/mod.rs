//! Action configuration loaded from CLI, environment, and files.
//!
//! [`ActionConfig`] merges the settings a GitHub client needs using
//! ortho-config's layered approach. The `GITHUB` prefix lines the
//! environment layer up with the variables the runner already exports.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.actionkit.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `GITHUB_TOKEN`, `GITHUB_API_URL`,
//!    `GITHUB_OUTPUT`, `GITHUB_REPOSITORY`
//! 4. **Command-line arguments** – `--token`/`-t`, `--api-url`, `--output`,
//!    `--repository`/`-r`
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! api_url = "https://ghe.example.com/api/v3"
//! repository = "octocat/hello-world"
//! ```

use std::env;
use std::ffi::OsString;

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::split_repository;

/// REST API base used when none is configured.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const TOKEN_VAR: &str = "GITHUB_TOKEN";

const APP_NAME: &str = "actionkit";

/// Errors raised while loading or interrogating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Layered configuration could not be loaded.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader failure detail.
        message: String,
    },

    /// No token was supplied by any source.
    #[error("GitHub token is required (use --token or GITHUB_TOKEN)")]
    MissingToken,

    /// No repository was supplied by any source.
    #[error("repository is required (use --repository or GITHUB_REPOSITORY)")]
    MissingRepository,

    /// The repository is not `owner/name`.
    #[error("repository must be in the form owner/name, got {value:?}")]
    InvalidRepository {
        /// Raw repository value.
        value: String,
    },
}

/// Settings for talking to GitHub from an action.
///
/// # Example
///
/// ```no_run
/// use actionkit::config::ActionConfig;
///
/// let config = ActionConfig::load_layers().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// println!("talking to {}", config.api_base());
/// # let _ = token;
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GITHUB",
    discovery(
        dotfile_name = ".actionkit.toml",
        config_file_name = "actionkit.toml",
        app_name = "actionkit"
    )
)]
pub struct ActionConfig {
    /// Personal access token or `GITHUB_TOKEN` secret.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// REST API base URL, e.g. `https://ghe.example.com/api/v3`.
    pub api_url: Option<String>,

    /// Path of the step output file.
    pub output: Option<String>,

    /// Repository in `owner/name` form.
    #[ortho_config(cli_short = 'r')]
    pub repository: Option<String>,
}

impl ActionConfig {
    /// Loads every layer from the process arguments, environment and
    /// discovered configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be read or merged.
    pub fn load_layers() -> Result<Self, ConfigError> {
        Self::load().map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Loads defaults, configuration files and environment variables,
    /// ignoring the process arguments.
    ///
    /// Action binaries may define their own command line, so the runtime
    /// loads its settings through this rather than [`Self::load_layers`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be read or merged.
    pub fn load_without_cli() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(APP_NAME)]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Resolves the token from configuration, falling back to the
    /// `GITHUB_TOKEN` environment variable.
    ///
    /// Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when no source provides a value.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        self.token
            .clone()
            .or_else(|| env::var(TOKEN_VAR).ok())
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// REST API base URL, defaulting to [`DEFAULT_API_URL`].
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
    }

    /// Configured step output file, if any.
    #[must_use]
    pub fn output_path(&self) -> Option<&Utf8Path> {
        self.output
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(Utf8Path::new)
    }

    /// Returns the configured repository split into owner and name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRepository`] when unset and
    /// [`ConfigError::InvalidRepository`] when not of the form `owner/name`.
    pub fn require_repository(&self) -> Result<(&str, &str), ConfigError> {
        let value = self
            .repository
            .as_deref()
            .ok_or(ConfigError::MissingRepository)?;
        split_repository(value).ok_or_else(|| ConfigError::InvalidRepository {
            value: value.to_owned(),
        })
    }
}
