//! Input handling for the desk prompt
//!
//! One command per line on stdin; see [`help::commands_help`].

pub mod commands;
pub mod help;

pub use commands::Command;
pub use help::format_help;
