//! Configuration value interpolation
//!
//! Path-like values may use `~`, `$VAR` or `${VAR}`. Unlike free-form
//! strings, an unset variable in a path is an error: silently dropping it
//! would point the runner at the wrong executable.

use crate::error::BatchError;

use super::model::Config;

/// Expand `~` and environment variables in a single value
///
/// # Examples
///
/// ```
/// use modrunner::config::interpolate::expand_value;
///
/// std::env::set_var("DOC_PROJECT_ROOT", "/srv/project");
/// assert_eq!(
///     expand_value("$DOC_PROJECT_ROOT/gradlew").unwrap(),
///     "/srv/project/gradlew"
/// );
/// std::env::remove_var("DOC_PROJECT_ROOT");
/// ```
pub fn expand_value(value: &str) -> Result<String, BatchError> {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| BatchError::Config(format!("cannot expand '{}': {}", value, e)))
}

/// Expand the path-like fields of a [`Config`] in place
pub fn interpolate_config(config: &mut Config) -> Result<(), BatchError> {
    config.runner.build_tool = expand_value(&config.runner.build_tool)?;
    config.runner.working_dir = expand_value(&config.runner.working_dir)?;
    Ok(())
}
