//! Trigger kinds an action can gate on.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Kind of trigger that started the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A push to a branch or tag.
    Push,
    /// Pull request activity.
    PullRequest,
}

impl Event {
    /// Returns the event name used by the runner.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = EventError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "push" => Ok(Self::Push),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(EventError::Unrecognised {
                name: other.to_owned(),
            }),
        }
    }
}

/// Errors raised when gating on the trigger event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    /// The event name is not one this crate knows.
    #[error("unrecognised event: {name}")]
    Unrecognised {
        /// Raw event name.
        name: String,
    },

    /// The event parsed but the action does not handle it.
    #[error("unsupported event: {event} (supported: {})", format_supported(.supported))]
    Unsupported {
        /// Parsed event.
        event: Event,
        /// Events the caller accepts.
        supported: Vec<Event>,
    },
}

fn format_supported(supported: &[Event]) -> String {
    if supported.is_empty() {
        return "none".to_owned();
    }
    supported
        .iter()
        .map(Event::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses an event name.
///
/// # Errors
///
/// Returns [`EventError::Unrecognised`] for anything but `push` and
/// `pull_request`.
pub fn parse_event(name: &str) -> Result<Event, EventError> {
    name.parse()
}

/// Parses `name` and checks it against `supported`.
///
/// # Errors
///
/// Returns [`EventError::Unrecognised`] when parsing fails and
/// [`EventError::Unsupported`] when the event is not in `supported`.
pub fn check_supported_event(name: &str, supported: &[Event]) -> Result<Event, EventError> {
    let event = parse_event(name)?;
    if supported.contains(&event) {
        Ok(event)
    } else {
        Err(EventError::Unsupported {
            event,
            supported: supported.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Event, EventError, check_supported_event, parse_event};

    #[rstest]
    #[case::push("push", Event::Push)]
    #[case::pull_request("pull_request", Event::PullRequest)]
    fn parses_known_events(#[case] name: &str, #[case] expected: Event) {
        assert_eq!(parse_event(name), Ok(expected));
    }

    #[rstest]
    #[case::unknown("toto")]
    #[case::capitalised("Push")]
    #[case::target_variant("pull_request_target")]
    fn rejects_unknown_events(#[case] name: &str) {
        assert_eq!(
            parse_event(name),
            Err(EventError::Unrecognised {
                name: name.to_owned()
            })
        );
    }

    #[rstest]
    fn accepts_supported_event() {
        assert_eq!(
            check_supported_event("pull_request", &[Event::Push, Event::PullRequest]),
            Ok(Event::PullRequest)
        );
    }

    #[rstest]
    fn empty_supported_set_never_matches() {
        let result = check_supported_event("push", &[]);
        assert!(
            matches!(result, Err(EventError::Unsupported { event: Event::Push, .. })),
            "expected Unsupported, got {result:?}"
        );
    }

    #[rstest]
    fn unparseable_event_fails_before_support_check() {
        let result = check_supported_event("toto", &[Event::Push]);
        assert!(
            matches!(result, Err(EventError::Unrecognised { .. })),
            "expected Unrecognised, got {result:?}"
        );
    }

    #[rstest]
    fn parsed_but_unsupported_event_fails() {
        let error = check_supported_event("push", &[Event::PullRequest])
            .expect_err("push should be unsupported");
        assert_eq!(
            error.to_string(),
            "unsupported event: push (supported: pull_request)"
        );
    }
}
