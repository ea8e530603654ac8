//! Command execution module
//!
//! Provides async command execution with:
//! - Timeout support
//! - Output discard, streaming or capture with truncation
//! - Environment variable injection
//! - Working directory control

pub mod runner;

pub use runner::*;
