//! Error types for modrunner
//!
//! Every failure of a batch run collapses to exit status 1; the variants
//! exist so the message printed before exiting says what went wrong.

use std::time::Duration;

use thiserror::Error;

/// Main error type for batch operations
#[derive(Error, Debug)]
pub enum BatchError {
    /// The modules directory could not be listed
    #[error("Cannot read modules directory {path}: {source}")]
    ModulesDirUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured build tool does not exist or is not executable
    #[error("Build tool not found: {tool}")]
    BuildToolNotFound {
        tool: String,
        suggestion: Option<String>,
    },

    /// Failed to spawn the build tool
    #[error("Failed to spawn command: {command}")]
    SpawnFailed { command: String, error: String },

    /// The build tool returned a non-zero exit code for a module
    #[error("Module '{module}' failed ({index} of {total}) with exit code {}", display_code(.exit_code))]
    ModuleFailed {
        module: String,
        index: usize,
        total: usize,
        exit_code: Option<i32>,
        command: String,
        suggestion: Option<String>,
    },

    /// Command timed out
    #[error("Command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        // Killed by a signal on Unix
        None => "none".to_string(),
    }
}

impl BatchError {
    /// Hint to show below the error message, if one applies
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            BatchError::BuildToolNotFound { suggestion, .. }
            | BatchError::ModuleFailed { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

/// Suggest fixes for common build tool failure patterns
pub fn suggest_fix(command: &str, output: &str) -> Option<String> {
    // Gradle project resolution
    if output.contains("Project '") && output.contains("not found") {
        return Some(
            "Gradle does not know this module. Check that it is included in settings.gradle."
                .to_string(),
        );
    }

    if output.contains("Task '") && output.contains("not found in project") {
        return Some(
            "The module has no such task. Run './gradlew tasks' in the module to see what it provides."
                .to_string(),
        );
    }

    if output.contains("Could not find or load main class org.gradle.wrapper.GradleWrapperMain") {
        return Some(
            "gradle/wrapper/gradle-wrapper.jar is missing. Regenerate the wrapper with 'gradle wrapper'."
                .to_string(),
        );
    }

    if output.contains("JAVA_HOME is not set") || output.contains("JAVA_HOME is set to an invalid") {
        return Some("Point JAVA_HOME at a JDK supported by the project.".to_string());
    }

    // Permission errors
    if output.contains("Permission denied") {
        if command.contains("gradlew") {
            return Some("gradlew is not executable. Run 'chmod +x gradlew'.".to_string());
        }
        return Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        );
    }

    None
}
