//! Toolkit for writing GitHub Actions in Rust.
//!
//! The crate reads typed inputs from the `INPUT_*` variables the runner
//! exports, records step outputs in the `GITHUB_OUTPUT` file and runs an
//! action handler so that every failure, including its causes, marks the run
//! failed exactly once. A thin Octocrab-backed client covers the GitHub REST
//! calls actions commonly make.
//!
//! ```no_run
//! use std::process::ExitCode;
//!
//! use actionkit::dispatch::run_action;
//! use actionkit::inputs::{InputSchema, boolean_input, string_input};
//! use actionkit::outputs::Outputs;
//!
//! #[tokio::main]
//! async fn main() -> ExitCode {
//!     let schema = InputSchema::new()
//!         .input("greeting", string_input().default("hello"))
//!         .input("shout", boolean_input().default(false));
//!     run_action(Some(&schema), |inputs| async move {
//!         let greeting = inputs.string("greeting").unwrap_or_default();
//!         let message = if inputs.boolean("shout") == Some(true) {
//!             greeting.to_uppercase()
//!         } else {
//!             greeting.to_owned()
//!         };
//!         Ok(Some(Outputs::from([("message".to_owned(), message)])))
//!     })
//!     .await
//! }
//! ```

pub mod config;
pub mod context;
pub mod dispatch;
pub mod event;
pub mod github;
pub mod inputs;
pub mod outputs;
pub mod runtime;

pub use config::{ActionConfig, ConfigError};
pub use context::{ContextError, RunContext};
pub use dispatch::{Dispatcher, HandlerResult, RunStatus, run_action};
pub use event::{Event, EventError, check_supported_event, parse_event};
pub use github::{ApiError, ApiErrorKind, GitHubApi, GitHubClient, ScopedClient};
pub use inputs::{InputSchema, Inputs, get_inputs};
pub use outputs::{Outputs, parse_outputs};
pub use runtime::{ActionRuntime, GitHubActionsRuntime};
