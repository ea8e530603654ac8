//! Gradle build tool
//!
//! Runs `<tool> :<prefix>:<module>:<task> [extra args...]` for each module.
//! The tool path is configured relative to the modules directory and the
//! process runs in the project root, one level above it by default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::RunnerConfig;
use crate::error::BatchError;
use crate::executor::{command_line, exec_command_sync, ExecOptions};
use crate::modules::Module;

use super::traits::{Action, BuildTool, Invocation, RunnerResult};

/// Gradle (or Gradle wrapper) driven through project task paths
#[derive(Debug, Clone)]
pub struct GradleTool {
    /// Tool as written in the configuration, used for display
    display_tool: String,
    /// Program actually executed
    program: PathBuf,
    /// Gradle project containing the modules, empty for the root project
    project_prefix: String,
    /// Arguments appended after the task path
    extra_args: Vec<String>,
    /// Working directory, environment, timeout and output policy
    exec_options: ExecOptions,
}

impl GradleTool {
    /// Create a tool from configuration, resolving paths against `modules_dir`
    ///
    /// `modules_dir` should be absolute: a relative tool path combined with a
    /// changed working directory is ambiguous for process spawning.
    pub fn from_config(config: &RunnerConfig, modules_dir: &Path) -> Self {
        let program = resolve_program(&config.build_tool, modules_dir);
        let working_dir = modules_dir.join(&config.working_dir);

        let exec_options = config.env.iter().fold(
            ExecOptions::in_dir(working_dir)
                .with_timeout_secs(config.timeout)
                .with_output(config.output),
            |options, (key, value)| options.with_env(key, value),
        );

        Self {
            display_tool: config.build_tool.clone(),
            program,
            project_prefix: config.project_prefix.clone(),
            extra_args: config.extra_args.clone(),
            exec_options,
        }
    }

    /// Program that will be executed
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Working directory of the spawned tool
    pub fn working_dir(&self) -> Option<&Path> {
        self.exec_options.working_dir.as_deref()
    }

    /// Gradle task path for a module, e.g. `:modules:auth:assemble`
    ///
    /// The module name is copied as raw OS bytes, not re-encoded.
    pub fn task_path(&self, module: &Module, action: Action) -> OsString {
        let prefix = self.project_prefix.trim_matches(':');
        let mut path = OsString::from(":");
        if !prefix.is_empty() {
            path.push(prefix);
            path.push(":");
        }
        path.push(&module.name);
        path.push(":");
        path.push(action.task_name());
        path
    }

    fn args(&self, module: &Module, action: Action) -> Vec<OsString> {
        let mut args = vec![self.task_path(module, action)];
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

impl BuildTool for GradleTool {
    fn preflight(&self) -> RunnerResult<()> {
        match which::which(&self.program) {
            Ok(found) => {
                tracing::debug!("Using build tool: {}", found.display());
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Build tool lookup failed: {}", e);
                Err(BatchError::BuildToolNotFound {
                    tool: self.program.display().to_string(),
                    suggestion: Some(format!(
                        "Run modrunner from the modules directory so '{}' resolves, \
                         or set runner.build_tool in .modrunner.toml.",
                        self.display_tool
                    )),
                })
            }
        }
    }

    fn command_line(&self, module: &Module, action: Action) -> String {
        command_line(&self.display_tool, &self.args(module, action))
    }

    fn invoke(&self, module: &Module, action: Action) -> RunnerResult<Invocation> {
        let args = self.args(module, action);
        let result = exec_command_sync(&self.program, &args, &self.exec_options)?;

        Ok(Invocation {
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            duration_ms: result.duration.as_millis() as u64,
        })
    }
}

/// Tool names without a path separator are looked up on PATH; anything
/// else is relative to the modules directory.
fn resolve_program(tool: &str, modules_dir: &Path) -> PathBuf {
    let path = Path::new(tool);
    if path.is_absolute() || !tool.contains(['/', std::path::MAIN_SEPARATOR]) {
        path.to_path_buf()
    } else {
        modules_dir.join(path)
    }
}
