//! Execution envelope for an action entry point.
//!
//! The dispatcher resolves declared inputs, invokes the handler, forwards
//! returned outputs and converts any failure into exactly one
//! [`ActionRuntime::set_failed`] call. Handler errors, input failures,
//! output-write failures and panics all end there; nothing propagates to the
//! caller, which only sees a [`RunStatus`].

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use futures::FutureExt;
use serde::Serialize;

use crate::context::RunContext;
use crate::inputs::{InputSchema, InputSource, Inputs, ProcessEnvironment, get_inputs, raw_inputs};
use crate::outputs::Outputs;
use crate::runtime::{ActionRuntime, GitHubActionsRuntime};

/// What a handler returns: optional outputs or an error with its causes.
pub type HandlerResult = anyhow::Result<Option<Outputs>>;

/// Final state of a dispatched run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The handler finished and every output was recorded.
    Succeeded,
    /// The run was marked failed.
    Failed,
}

impl RunStatus {
    /// Returns `true` for [`RunStatus::Succeeded`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Succeeded => Self::SUCCESS,
            RunStatus::Failed => Self::FAILURE,
        }
    }
}

/// Runs handlers against a runtime and an input source.
pub struct Dispatcher<'env, R>
where
    R: ActionRuntime + ?Sized,
{
    runtime: &'env R,
    source: &'env dyn InputSource,
}

impl<'env, R> Dispatcher<'env, R>
where
    R: ActionRuntime + ?Sized,
{
    /// Creates a dispatcher over `runtime`, reading inputs from `source`.
    #[must_use]
    pub const fn new(runtime: &'env R, source: &'env dyn InputSource) -> Self {
        Self { runtime, source }
    }

    /// Invokes a handler that takes no inputs.
    pub async fn run<F, Fut>(&self, handler: F) -> RunStatus
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        self.trace_environment();
        let outcome = invoke(handler).await;
        self.finish(outcome)
    }

    /// Resolves `schema` and invokes the handler with the result.
    ///
    /// The handler is not invoked when resolution fails.
    pub async fn run_with_inputs<F, Fut>(&self, schema: &InputSchema, handler: F) -> RunStatus
    where
        F: FnOnce(Inputs) -> Fut,
        Fut: Future<Output = HandlerResult>,
    {
        self.trace_environment();
        let inputs = match get_inputs(schema, self.source) {
            Ok(inputs) => inputs,
            Err(error) => return self.fail(&anyhow::Error::new(error)),
        };
        self.trace("inputs", &inputs);
        let outcome = invoke(move || handler(inputs)).await;
        self.finish(outcome)
    }

    fn finish(&self, outcome: HandlerResult) -> RunStatus {
        match outcome {
            Ok(outputs) => self.forward_outputs(outputs.unwrap_or_default()),
            Err(error) => self.fail(&error),
        }
    }

    fn forward_outputs(&self, outputs: Outputs) -> RunStatus {
        for (name, value) in &outputs {
            if let Err(error) = self.runtime.set_output(name, value) {
                let wrapped =
                    anyhow::Error::new(error).context(format!("failed to set output `{name}`"));
                return self.fail(&wrapped);
            }
        }
        RunStatus::Succeeded
    }

    fn fail(&self, error: &anyhow::Error) -> RunStatus {
        let message = render_error(error);
        tracing::warn!(%message, "action run failed");
        self.runtime.set_failed(&message);
        RunStatus::Failed
    }

    /// Traces the `INPUT_*` variables and the run context when debugging.
    ///
    /// Only input variables are echoed; the rest of the environment may hold
    /// secrets and is never traced.
    fn trace_environment(&self) {
        if !self.runtime.is_debug() {
            return;
        }
        self.trace("environment", &raw_inputs(self.source));
        self.trace("context", &RunContext::from_source(self.source));
    }

    fn trace(&self, label: &str, value: &impl Serialize) {
        if !self.runtime.is_debug() {
            return;
        }
        match serde_json::to_string(value) {
            Ok(serialised) => self.runtime.debug(&format!("{label}: {serialised}")),
            Err(error) => tracing::debug!(label, %error, "failed to serialise debug trace"),
        }
    }
}

/// Renders an error and its causes on one line, outermost first.
#[must_use]
pub fn render_error(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

/// Runs a handler against the real runner environment.
///
/// This is the outermost entry point: it reads the process environment for
/// inputs, writes outputs to `GITHUB_OUTPUT` and returns the exit code the
/// action binary should use.
pub async fn run_action<F, Fut>(schema: Option<&InputSchema>, handler: F) -> ExitCode
where
    F: FnOnce(Inputs) -> Fut,
    Fut: Future<Output = HandlerResult>,
{
    let runtime = GitHubActionsRuntime::from_env();
    let dispatcher = Dispatcher::new(&runtime, &ProcessEnvironment);
    let status = match schema {
        Some(declared) => dispatcher.run_with_inputs(declared, handler).await,
        None => dispatcher.run(move || handler(Inputs::default())).await,
    };
    status.into()
}

async fn invoke<F, Fut>(handler: F) -> HandlerResult
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = HandlerResult>,
{
    let future = match panic::catch_unwind(AssertUnwindSafe(handler)) {
        Ok(future) => future,
        Err(payload) => return Err(panic_error(payload.as_ref())),
    };
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())))
}

fn panic_error(payload: &(dyn Any + Send)) -> anyhow::Error {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    anyhow::anyhow!("handler panicked: {detail}")
}
