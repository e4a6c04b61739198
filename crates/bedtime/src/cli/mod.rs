//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bedtime binary.

mod commands;
mod prompt;
mod tell;

pub use commands::{Cli, Commands};
pub use prompt::{show_config, show_prompt};
pub use tell::tell_story;
