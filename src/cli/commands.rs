//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{Config, OutputMode};
use crate::runner::Action;

/// Run a build tool task once per module directory.
///
/// Every immediate subdirectory of the modules directory is a module. The
/// build tool (../gradlew by default) is invoked as
/// `<tool> :modules:<name>:<task>`, one module at a time, and the run stops
/// at the first failure.
#[derive(Parser, Debug)]
#[command(name = "modrunner")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Modules directory (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true, env = "MODRUNNER_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble every module
    Assemble(BatchArgs),

    /// Test every module
    Test(BatchArgs),

    /// List discovered modules and the command each would run
    List(ListArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

/// Arguments shared by `assemble` and `test`
#[derive(Args, Debug, Default)]
pub struct BatchArgs {
    /// What to do with the build tool's stdout
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Per-module timeout in seconds (0 for no timeout)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Build tool, relative to the modules directory
    #[arg(long)]
    pub tool: Option<String>,

    /// Gradle project the modules belong to
    #[arg(long)]
    pub prefix: Option<String>,

    /// Extra arguments passed to the build tool after the task path
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl BatchArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = self.output {
            config.runner.output = output;
        }
        if let Some(timeout) = self.timeout {
            config.runner.timeout = timeout;
        }
        if let Some(ref tool) = self.tool {
            config.runner.build_tool = tool.clone();
        }
        if let Some(ref prefix) = self.prefix {
            config.runner.project_prefix = prefix.clone();
        }
        config.runner.extra_args.extend(self.extra.iter().cloned());
    }
}

/// Arguments for the `list` subcommand
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Show commands for this action
    #[arg(short, long, value_enum, default_value = "assemble")]
    pub action: Action,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
    /// Plain text (one module per line)
    Plain,
}

/// Arguments for the `config` subcommand
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}
