//! CLI module for quoteloop - command-line interface and subcommands.
//!
//! Running with no subcommand is the same as `run` with configured defaults.

pub mod commands;

pub use commands::Cli;
