//! Common traits and types for the batch runner
//!
//! Defines the action being run and the interface a build tool must
//! implement to be driven once per module.

use std::fmt;

use serde::Serialize;

use crate::error::BatchError;
use crate::modules::Module;

/// Result type for runner operations
pub type RunnerResult<T> = Result<T, BatchError>;

/// Which task is run in every module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Build each module
    Assemble,
    /// Test each module
    Test,
}

impl Action {
    /// Task name passed to the build tool
    pub fn task_name(&self) -> &'static str {
        match self {
            Action::Assemble => "assemble",
            Action::Test => "test",
        }
    }

    /// Verb used in progress lines
    pub fn progress_verb(&self) -> &'static str {
        match self {
            Action::Assemble => "Building",
            Action::Test => "Testing",
        }
    }

    /// Progress line shown before the module at 1-based `index` of `total`
    pub fn progress_line(&self, index: usize, total: usize) -> String {
        format!(
            "{} modules {} out of {}.",
            self.progress_verb(),
            index,
            total
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}

/// Outcome of one build tool invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct Invocation {
    /// Exit code, `None` when killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stdout (empty unless capturing)
    pub stdout: String,
    /// Captured stderr (empty unless capturing)
    pub stderr: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl Invocation {
    /// Zero exit code is the only success signal
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// An external program that can run a task for one module
///
/// The batch runner only looks at the exit code; everything else about the
/// tool is opaque.
pub trait BuildTool {
    /// Check the tool can be launched at all; called once before the first module
    fn preflight(&self) -> RunnerResult<()> {
        Ok(())
    }

    /// Command line that `invoke` would run (for display/logging)
    fn command_line(&self, module: &Module, action: Action) -> String;

    /// Run the action for one module and wait for it to finish
    ///
    /// # Errors
    /// * `BatchError::SpawnFailed` - If the tool cannot be started
    /// * `BatchError::Timeout` - If a timeout is configured and exceeded
    fn invoke(&self, module: &Module, action: Action) -> RunnerResult<Invocation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_task_names() {
        assert_eq!(Action::Assemble.task_name(), "assemble");
        assert_eq!(Action::Test.task_name(), "test");
        assert_eq!(Action::Test.to_string(), "test");
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(
            Action::Assemble.progress_line(1, 2),
            "Building modules 1 out of 2."
        );
        assert_eq!(Action::Test.progress_line(3, 10), "Testing modules 3 out of 10.");
    }

    #[test]
    fn test_invocation_success() {
        let exited = |code| Invocation {
            exit_code: code,
            ..Default::default()
        };
        assert!(exited(Some(0)).success());
        assert!(!exited(Some(1)).success());
        assert!(!exited(None).success());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Assemble).unwrap();
        assert_eq!(json, "\"assemble\"");
    }
}
