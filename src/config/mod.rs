//! Configuration module for modrunner
//!
//! Provides XDG-compliant layered configuration loading with
//! path expansion for the build tool location.

pub mod interpolate;
pub mod loader;
pub mod model;

pub use interpolate::interpolate_config;
pub use loader::{config_paths, find_config_files, load_config};
pub use model::*;
