//! modrunner - run a build tool task once per module directory
//!
//! Walks the immediate subdirectories of a modules folder and invokes the
//! build tool (a Gradle wrapper by default) for each of them:
//!
//! ```text
//! ../gradlew :modules:<name>:assemble
//! ../gradlew :modules:<name>:test
//! ```
//!
//! ## Behaviour
//!
//! - Modules run one at a time, in name order
//! - A progress line is printed before each module
//! - The first non-zero exit stops the run; nothing after it is attempted
//! - No modules means nothing to do, which counts as success
//!
//! ## Configuration
//!
//! XDG-compliant layered TOML files plus `MODRUNNER_` environment variables
//! select the tool, the Gradle project prefix, extra arguments, a per-module
//! timeout and what happens to the tool's output.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod modules;
pub mod runner;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::BatchError;
pub use executor::{exec_command, exec_command_sync, ExecOptions, ExecResult};
pub use modules::{discover_modules, Module};
pub use runner::{Action, BatchRunner, BatchSummary, BuildTool, GradleTool, Invocation};
