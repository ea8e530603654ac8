//! Configuration model for modrunner
//!
//! Defines the structure for XDG-compliant layered configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// How the build tool is located and invoked
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Which subdirectories count as modules
    #[serde(default)]
    pub modules: ModulesConfig,
}

/// How stdout of the build tool is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Read stdout and drop it; stderr stays on the console
    #[default]
    Discard,
    /// Forward stdout and stderr live
    Stream,
    /// Keep stdout and stderr, print them only for a failing module
    Capture,
}

/// Build tool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Build tool executable, relative to the modules directory
    #[serde(default = "default_build_tool")]
    pub build_tool: String,

    /// Working directory for the build tool, relative to the modules directory
    #[serde(default = "default_working_dir")]
    pub working_dir: String,

    /// Gradle project the modules live under (`modules` gives `:modules:<name>`)
    #[serde(default = "default_project_prefix")]
    pub project_prefix: String,

    /// Extra arguments appended after the task path
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Per-module timeout in seconds (0 for no timeout)
    #[serde(default)]
    pub timeout: u64,

    /// What to do with the build tool's output
    #[serde(default)]
    pub output: OutputMode,

    /// Extra environment variables for the build tool (e.g. `JAVA_HOME`)
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_build_tool() -> String {
    "../gradlew".to_string()
}

fn default_working_dir() -> String {
    "..".to_string()
}

fn default_project_prefix() -> String {
    "modules".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            build_tool: default_build_tool(),
            working_dir: default_working_dir(),
            project_prefix: default_project_prefix(),
            extra_args: Vec::new(),
            timeout: 0,
            output: OutputMode::default(),
            env: BTreeMap::new(),
        }
    }
}

/// Module discovery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModulesConfig {
    /// Directory names never treated as modules
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether dot-directories count as modules
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,
}

fn default_include_hidden() -> bool {
    true
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            include_hidden: default_include_hidden(),
        }
    }
}
