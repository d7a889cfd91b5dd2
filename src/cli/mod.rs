//! Command-line interface
//!
//! Subcommand implementations live in [`commands`]; [`ui`] holds the shared
//! terminal styling.

pub mod commands;
pub mod ui;

pub use ui::Output;
