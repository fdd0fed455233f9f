//! CLI layer.
//!
//! Provides the command-line interface using clap. Every command is a single
//! pass: read configuration, read the model, talk to the store, report.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
