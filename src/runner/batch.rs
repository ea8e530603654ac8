//! Sequential, fail-fast batch over all modules
//!
//! Each module gets a progress line, the command line being run, and one
//! build tool invocation. The first non-zero exit stops the batch; nothing
//! after it is attempted.

use std::io::Write;
use std::time::Instant;

use serde::Serialize;

use crate::error::{suggest_fix, BatchError};
use crate::modules::Module;

use super::traits::{Action, BuildTool, RunnerResult};

/// Summary of a batch where every module succeeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub action: Action,
    /// Number of modules the tool ran for
    pub modules: usize,
    pub duration_ms: u64,
}

/// Drives a [`BuildTool`] over a list of modules
pub struct BatchRunner<'a, T: BuildTool + ?Sized> {
    tool: &'a T,
}

impl<'a, T: BuildTool + ?Sized> BatchRunner<'a, T> {
    pub fn new(tool: &'a T) -> Self {
        Self { tool }
    }

    /// Run `action` for every module in order, writing progress to `out`
    ///
    /// An empty module list succeeds without touching the tool. Output
    /// captured from a failing module goes to `out` (its stdout) and `err`
    /// (its stderr).
    ///
    /// # Errors
    /// * `BatchError::ModuleFailed` - The first module whose invocation exits non-zero
    /// * Whatever `preflight` or `invoke` report for a tool that cannot run
    pub fn run<W: Write, E: Write>(
        &self,
        modules: &[Module],
        action: Action,
        out: &mut W,
        err: &mut E,
    ) -> RunnerResult<BatchSummary> {
        let start = Instant::now();
        let total = modules.len();

        if total > 0 {
            self.tool.preflight()?;
        }

        for (position, module) in modules.iter().enumerate() {
            let index = position + 1;
            let command = self.tool.command_line(module, action);

            writeln!(out, "{}", action.progress_line(index, total))?;
            writeln!(out, "{}", command)?;
            out.flush()?;

            let name = module.display_name();
            tracing::debug!("Module {} ({}/{})", name, index, total);
            let invocation = self.tool.invoke(module, action)?;

            if !invocation.success() {
                tracing::debug!(
                    "Module {} failed with exit code {:?} after {}ms",
                    name,
                    invocation.exit_code,
                    invocation.duration_ms
                );

                // Only non-empty when output is being captured
                out.write_all(invocation.stdout.as_bytes())?;
                out.flush()?;
                err.write_all(invocation.stderr.as_bytes())?;
                err.flush()?;

                let combined = format!("{}{}", invocation.stdout, invocation.stderr);
                return Err(BatchError::ModuleFailed {
                    module: name.into_owned(),
                    index,
                    total,
                    exit_code: invocation.exit_code,
                    suggestion: suggest_fix(&command, &combined),
                    command,
                });
            }
        }

        Ok(BatchSummary {
            action,
            modules: total,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
