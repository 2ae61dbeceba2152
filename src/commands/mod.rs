//! Command parsing
//!
//! Handles the REPL command lines (lines starting with `/`)

pub mod parser;

pub use parser::{Command, help_text, parse_command};
