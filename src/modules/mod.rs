//! Module discovery
//!
//! Lists the subdirectories of the modules folder that the batch runner
//! walks over.

pub mod discover;

pub use discover::{discover_modules, Module};
