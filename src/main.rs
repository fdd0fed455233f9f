//! Binary entry point for redisai-loader.
//!
//! Every failure ends up in one place: it is printed as a single error line
//! and, unless `--strict` is set, the process still exits successfully.

#![allow(clippy::print_stderr)]

use clap::Parser;
use redisai_loader::cli::output::{OutputFormat, format_error};
use redisai_loader::cli::{Cli, execute};
use redisai_loader::logging;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);
    logging::init(cli.verbose);

    match execute(&cli) {
        Ok(output) => write_stdout(&output),
        Err(e) => {
            tracing::debug!(error = ?e, "registration failed");
            let code = write_stdout(&format!("{}\n", format_error(&e, format)));
            if cli.strict {
                ExitCode::FAILURE
            } else {
                code
            }
        }
    }
}

/// Writes to stdout, treating a closed pipe (e.g. piped to `head` or `jq`)
/// as success.
fn write_stdout(text: &str) -> ExitCode {
    if let Err(e) = write!(io::stdout(), "{text}")
        && e.kind() != io::ErrorKind::BrokenPipe
    {
        eprintln!("Error writing to stdout: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
