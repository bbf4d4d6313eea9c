//! Page rendering for the command-line front end.

pub mod format;

pub use format::{OutputFormat, PageOutput, format_as_markdown, format_as_table, render};
