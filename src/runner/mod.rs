//! Runner module for driving the build tool across modules
//!
//! Provides:
//! - The `BuildTool` interface and the `Action` being run
//! - A Gradle implementation invoking `:modules:<name>:<task>`
//! - The sequential fail-fast batch loop

pub mod batch;
pub mod gradle;
pub mod traits;

pub use batch::{BatchRunner, BatchSummary};
pub use gradle::GradleTool;
pub use traits::*;
