//! CLI module for modrunner
//!
//! Provides command-line interface with the following subcommands:
//! - `assemble` - Assemble every module
//! - `test` - Test every module
//! - `list` - List discovered modules
//! - `config` - Show configuration

pub mod commands;

pub use commands::{BatchArgs, Cli, Commands, OutputFormat};
