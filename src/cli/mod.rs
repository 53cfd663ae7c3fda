//! Command-line interface
//!
//! Argument parsing with clap, console output, and the glue that turns
//! Ctrl+C into a [`CancelToken`](crate::cancel::CancelToken) cancellation.

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::Output;
