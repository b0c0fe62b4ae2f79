//! Trigger context published by the runner in `GITHUB_*` variables.

use serde::Serialize;
use thiserror::Error;

use crate::event::{Event, EventError, parse_event};
use crate::inputs::{InputSource, ProcessEnvironment};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_SERVER_URL: &str = "https://github.com";
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Errors raised when the context lacks required details.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// `GITHUB_REPOSITORY` is not set.
    #[error("GITHUB_REPOSITORY is not set")]
    MissingRepository,

    /// `GITHUB_REPOSITORY` is not `owner/name`.
    #[error("repository must be in the form owner/name, got {value:?}")]
    InvalidRepository {
        /// Raw repository value.
        value: String,
    },

    /// `GITHUB_EVENT_NAME` is not set.
    #[error("GITHUB_EVENT_NAME is not set")]
    MissingEvent,

    /// The event name could not be parsed.
    #[error(transparent)]
    Event(#[from] EventError),
}

/// Snapshot of the run's trigger context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunContext {
    /// Name of the triggering event.
    pub event_name: Option<String>,
    /// Commit SHA that triggered the run.
    pub sha: Option<String>,
    /// Git ref that triggered the run.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Workflow name.
    pub workflow: Option<String>,
    /// Action identifier within the job.
    pub action: Option<String>,
    /// Login of the user that triggered the run.
    pub actor: Option<String>,
    /// Job identifier.
    pub job: Option<String>,
    /// Run number within the workflow.
    pub run_number: Option<u64>,
    /// Unique run identifier.
    pub run_id: Option<u64>,
    /// Repository in `owner/name` form.
    pub repository: Option<String>,
    /// REST API base URL.
    pub api_url: String,
    /// Web server URL.
    pub server_url: String,
    /// GraphQL endpoint URL.
    pub graphql_url: String,
}

impl RunContext {
    /// Reads the context from `source`.
    ///
    /// Numeric fields that fail to parse are treated as unset.
    #[must_use]
    pub fn from_source(source: &(impl InputSource + ?Sized)) -> Self {
        let text = |key: &str| source.var(key).filter(|value| !value.is_empty());
        let number = |key: &str| text(key).and_then(|value| value.parse::<u64>().ok());
        Self {
            event_name: text("GITHUB_EVENT_NAME"),
            sha: text("GITHUB_SHA"),
            git_ref: text("GITHUB_REF"),
            workflow: text("GITHUB_WORKFLOW"),
            action: text("GITHUB_ACTION"),
            actor: text("GITHUB_ACTOR"),
            job: text("GITHUB_JOB"),
            run_number: number("GITHUB_RUN_NUMBER"),
            run_id: number("GITHUB_RUN_ID"),
            repository: text("GITHUB_REPOSITORY"),
            api_url: text("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            server_url: text("GITHUB_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned()),
            graphql_url: text("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_owned()),
        }
    }

    /// Reads the context from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnvironment)
    }

    /// Splits the repository into owner and name.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingRepository`] when unset and
    /// [`ContextError::InvalidRepository`] when not `owner/name`.
    pub fn repo(&self) -> Result<(&str, &str), ContextError> {
        let value = self
            .repository
            .as_deref()
            .ok_or(ContextError::MissingRepository)?;
        split_repository(value).ok_or_else(|| ContextError::InvalidRepository {
            value: value.to_owned(),
        })
    }

    /// Parses the triggering event.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingEvent`] when unset and
    /// [`ContextError::Event`] when the name is not recognised.
    pub fn event(&self) -> Result<Event, ContextError> {
        let name = self
            .event_name
            .as_deref()
            .ok_or(ContextError::MissingEvent)?;
        Ok(parse_event(name)?)
    }
}

/// Splits `owner/name`, rejecting empty halves and extra segments.
pub(crate) fn split_repository(value: &str) -> Option<(&str, &str)> {
    let (owner, name) = value.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::{ContextError, RunContext};
    use crate::event::Event;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    fn reads_runner_variables() {
        let context = RunContext::from_source(&env(&[
            ("GITHUB_EVENT_NAME", "pull_request"),
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_REF", "refs/pull/4/merge"),
            ("GITHUB_RUN_NUMBER", "17"),
            ("GITHUB_RUN_ID", "not-a-number"),
            ("GITHUB_REPOSITORY", "octo/repo"),
        ]));

        assert_eq!(context.sha.as_deref(), Some("abc123"));
        assert_eq!(context.git_ref.as_deref(), Some("refs/pull/4/merge"));
        assert_eq!(context.run_number, Some(17));
        assert_eq!(context.run_id, None);
        assert_eq!(context.repo(), Ok(("octo", "repo")));
        assert_eq!(context.event(), Ok(Event::PullRequest));
    }

    #[rstest]
    fn falls_back_to_public_github_urls() {
        let context = RunContext::from_source(&env(&[]));
        assert_eq!(context.api_url, "https://api.github.com");
        assert_eq!(context.server_url, "https://github.com");
        assert_eq!(context.graphql_url, "https://api.github.com/graphql");
    }

    #[rstest]
    #[case::missing(&[], ContextError::MissingRepository)]
    #[case::no_slash(
        &[("GITHUB_REPOSITORY", "octo")],
        ContextError::InvalidRepository { value: "octo".to_owned() }
    )]
    #[case::extra_segment(
        &[("GITHUB_REPOSITORY", "octo/repo/extra")],
        ContextError::InvalidRepository { value: "octo/repo/extra".to_owned() }
    )]
    fn rejects_bad_repository(#[case] pairs: &[(&str, &str)], #[case] expected: ContextError) {
        let context = RunContext::from_source(&env(pairs));
        assert_eq!(context.repo(), Err(expected));
    }

    #[rstest]
    fn serialises_ref_field_name() {
        let context = RunContext::from_source(&env(&[("GITHUB_REF", "refs/heads/main")]));
        let value = serde_json::to_value(&context).expect("context should serialise");
        assert_eq!(value.get("ref"), Some(&serde_json::json!("refs/heads/main")));
    }
}
