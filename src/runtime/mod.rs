//! GitHub Actions host primitives.
//!
//! The dispatcher talks to the host only through [`ActionRuntime`]. The
//! production implementation writes workflow commands to stdout and records
//! outputs in the `GITHUB_OUTPUT` file; tests substitute a mock or the
//! recording runtime.

pub mod command;
#[cfg(any(test, feature = "test-support"))]
mod recording;

use std::io::{self, Write};

use camino::Utf8PathBuf;

use crate::config::ActionConfig;
use crate::inputs::{InputSource, ProcessEnvironment};
use crate::outputs::{self, OUTPUT_FILE_VAR, OutputError};

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingRuntime;

/// Environment variable the runner sets to `1` when step debugging is on.
pub const DEBUG_FLAG_VAR: &str = "RUNNER_DEBUG";

/// Host primitives consumed by the dispatcher.
#[cfg_attr(test, mockall::automock)]
pub trait ActionRuntime: Send + Sync {
    /// Returns `true` when debug logging is enabled for the run.
    fn is_debug(&self) -> bool;

    /// Emits a debug message.
    fn debug(&self, message: &str);

    /// Records an output value.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output cannot be recorded.
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError>;

    /// Marks the run as failed with a rendered message.
    fn set_failed(&self, message: &str);
}

/// Runtime backed by the real runner environment.
#[derive(Debug)]
pub struct GitHubActionsRuntime {
    output_file: Option<Utf8PathBuf>,
    debug: bool,
}

impl GitHubActionsRuntime {
    /// Creates a runtime writing outputs to `output_file`.
    ///
    /// Without an output file, outputs fall back to the legacy
    /// `::set-output` command.
    #[must_use]
    pub const fn new(output_file: Option<Utf8PathBuf>, debug: bool) -> Self {
        Self { output_file, debug }
    }

    /// Reads `GITHUB_OUTPUT` and `RUNNER_DEBUG` from `source`.
    #[must_use]
    pub fn from_source(source: &(impl InputSource + ?Sized)) -> Self {
        Self::from_config(&ActionConfig::default(), source)
    }

    /// Uses the configured output file, falling back to `GITHUB_OUTPUT` in
    /// `source`. The debug flag always comes from `RUNNER_DEBUG`.
    #[must_use]
    pub fn from_config(config: &ActionConfig, source: &(impl InputSource + ?Sized)) -> Self {
        let output_file = config.output_path().map(ToOwned::to_owned).or_else(|| {
            source
                .var(OUTPUT_FILE_VAR)
                .filter(|value| !value.trim().is_empty())
                .map(Utf8PathBuf::from)
        });
        let debug = source.var(DEBUG_FLAG_VAR).as_deref() == Some("1");
        Self::new(output_file, debug)
    }

    /// Reads the runtime settings from configuration files and the process
    /// environment.
    ///
    /// A configuration that fails to load is logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let config = ActionConfig::load_without_cli().unwrap_or_else(|error| {
            tracing::warn!(%error, "ignoring unreadable configuration");
            ActionConfig::default()
        });
        Self::from_config(&config, &ProcessEnvironment)
    }

    fn issue(line: &str) {
        let mut stdout = io::stdout().lock();
        if writeln!(stdout, "{line}").is_err() {
            tracing::warn!("failed to write workflow command to stdout");
        }
    }
}

impl ActionRuntime for GitHubActionsRuntime {
    fn is_debug(&self) -> bool {
        self.debug
    }

    fn debug(&self, message: &str) {
        Self::issue(&command::render("debug", &[], message));
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        match &self.output_file {
            Some(path) => outputs::append_output(path, name, value),
            None => {
                Self::issue("");
                Self::issue(&command::render("set-output", &[("name", name)], value));
                Ok(())
            }
        }
    }

    fn set_failed(&self, message: &str) {
        Self::issue(&command::render("error", &[], message));
    }
}

#[cfg(test)]
mod tests {
    //! Tests for the runner-backed runtime.

    use std::collections::HashMap;

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::{ActionRuntime, GitHubActionsRuntime};
    use crate::config::ActionConfig;
    use crate::outputs::{Outputs, parse_outputs};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[rstest]
    #[case::enabled(Some("1"), true)]
    #[case::disabled(Some("0"), false)]
    #[case::absent(None, false)]
    fn reads_debug_flag(#[case] flag: Option<&str>, #[case] expected: bool) {
        let env: HashMap<String, String> = flag
            .map(|value| ("RUNNER_DEBUG".to_owned(), value.to_owned()))
            .into_iter()
            .collect();
        assert_eq!(GitHubActionsRuntime::from_source(&env).is_debug(), expected);
    }

    #[rstest]
    fn outputs_round_trip_through_output_file() -> TestResult {
        let temp_dir = TempDir::new()?;
        let path = temp_base(&temp_dir)?.join("output");
        let env = HashMap::from([("GITHUB_OUTPUT".to_owned(), path.to_string())]);
        let runtime = GitHubActionsRuntime::from_source(&env);

        runtime.set_output("toto", "tata")?;
        let expected = Outputs::from([("toto".to_owned(), "tata".to_owned())]);
        assert_eq!(parse_outputs(None, &env)?, expected);

        runtime.set_output("toto", "titi")?;
        runtime.set_output("toto", "tutu")?;
        let outputs = parse_outputs(None, &env)?;
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs.get("toto").map(String::as_str), Some("tutu"));
        Ok(())
    }

    fn temp_base(temp_dir: &TempDir) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
            .map_err(|path| format!("non UTF-8 temp path: {}", path.display()))?;
        Ok(base)
    }

    #[rstest]
    fn configured_output_overrides_runner_variable() -> TestResult {
        let temp_dir = TempDir::new()?;
        let base = temp_base(&temp_dir)?;
        let configured = base.join("configured");
        let runner = base.join("runner");
        let config = ActionConfig {
            output: Some(configured.to_string()),
            ..Default::default()
        };
        let env = HashMap::from([("GITHUB_OUTPUT".to_owned(), runner.to_string())]);
        let runtime = GitHubActionsRuntime::from_config(&config, &env);

        runtime.set_output("answer", "42")?;

        let outputs = parse_outputs(Some(&configured), &HashMap::<String, String>::new())?;
        assert_eq!(outputs.get("answer").map(String::as_str), Some("42"));
        assert!(!runner.exists(), "runner output file should be untouched");
        Ok(())
    }

    #[rstest]
    #[case::unset(None)]
    #[case::blank(Some("  "))]
    fn unconfigured_output_falls_back_to_runner_variable(
        #[case] configured: Option<&str>,
    ) -> TestResult {
        let temp_dir = TempDir::new()?;
        let runner = temp_base(&temp_dir)?.join("runner");
        let config = ActionConfig {
            output: configured.map(str::to_owned),
            ..Default::default()
        };
        let env = HashMap::from([("GITHUB_OUTPUT".to_owned(), runner.to_string())]);
        let runtime = GitHubActionsRuntime::from_config(&config, &env);

        runtime.set_output("answer", "42")?;

        let outputs = parse_outputs(None, &env)?;
        assert_eq!(outputs.get("answer").map(String::as_str), Some("42"));
        Ok(())
    }
}
