//! In-memory runtime used by tests.

use std::sync::Mutex;

use crate::outputs::{OutputError, Outputs};

use super::ActionRuntime;

/// Runtime that records every primitive call instead of talking to a runner.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    debug: bool,
    debug_messages: Mutex<Vec<String>>,
    outputs: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingRuntime {
    /// Creates a recording runtime with debug logging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recording runtime with debug logging enabled.
    #[must_use]
    pub fn with_debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    /// Debug messages in emission order.
    #[must_use]
    pub fn debug_messages(&self) -> Vec<String> {
        snapshot(&self.debug_messages)
    }

    /// Output writes in call order, including repeated keys.
    #[must_use]
    pub fn output_writes(&self) -> Vec<(String, String)> {
        snapshot(&self.outputs)
    }

    /// Outputs folded into a mapping; later writes win.
    #[must_use]
    pub fn outputs(&self) -> Outputs {
        self.output_writes().into_iter().collect()
    }

    /// Messages passed to `set_failed`.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        snapshot(&self.failures)
    }
}

impl ActionRuntime for RecordingRuntime {
    fn is_debug(&self) -> bool {
        self.debug
    }

    fn debug(&self, message: &str) {
        push(&self.debug_messages, message.to_owned());
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        push(&self.outputs, (name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        push(&self.failures, message.to_owned());
    }
}

fn push<T>(slot: &Mutex<Vec<T>>, value: T) {
    if let Ok(mut guard) = slot.lock() {
        guard.push(value);
    }
}

fn snapshot<T: Clone>(slot: &Mutex<Vec<T>>) -> Vec<T> {
    slot.lock().map(|guard| guard.clone()).unwrap_or_default()
}
