//! Module discovery
//!
//! A module is any immediate subdirectory of the modules directory.
//! Files next to them are ignored, and so are names listed in
//! `modules.exclude`.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ModulesConfig;
use crate::error::BatchError;

/// One buildable/testable subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Directory name, passed to the build tool byte for byte even when it
    /// is not valid UTF-8
    pub name: OsString,
    /// Full path to the directory
    pub path: PathBuf,
}

impl Module {
    pub fn new(name: impl Into<OsString>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name for progress lines, logs and listings
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }
}

/// Discover modules in `dir`
///
/// The list is read once and sorted by name so the run order does not
/// depend on the filesystem's listing order.
///
/// # Errors
/// * `BatchError::ModulesDirUnreadable` - If `dir` cannot be listed
pub fn discover_modules(dir: &Path, options: &ModulesConfig) -> Result<Vec<Module>, BatchError> {
    let unreadable = |source: std::io::Error| BatchError::ModulesDirUnreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut modules = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();

        // Follows symlinks, so a link to a directory is a module
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name();

        if !options.include_hidden && name.as_encoded_bytes().starts_with(b".") {
            tracing::debug!("Skipping hidden directory: {:?}", name);
            continue;
        }

        if options.exclude.iter().any(|excluded| name == excluded.as_str()) {
            tracing::debug!("Skipping excluded directory: {:?}", name);
            continue;
        }

        modules.push(Module::new(name, path));
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(modules)
}
