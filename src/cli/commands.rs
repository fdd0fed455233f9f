//! CLI command implementations.
//!
//! Each command runs once: parse the connection string, read the model file,
//! connect, issue the store commands, format the report.

use crate::cli::output::{OutputFormat, format_connection, format_registration, format_upload};
use crate::cli::parser::{Cli, Commands, StoreArgs, UploadArgs};
use crate::core::{ConnectionInfo, REDIS_URL_ENV};
use crate::error::{CommandError, Result};
use crate::io::read_model;
use crate::loader::{register_model, upload_encoded};
use crate::store::{ConnectOptions, RedisModelStore};
use std::time::Duration;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if any step fails: connection string, file read,
/// connection, or store command.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match cli.effective_command() {
        Commands::Store(args) => cmd_store(cli, &args, format),
        Commands::Upload(args) => cmd_upload(cli, &args, format),
        Commands::InspectUrl => cmd_inspect_url(cli, format),
    }
}

/// Resolves the connection string, forcing TLS unless `--no-tls` is set.
fn connection_info(cli: &Cli) -> Result<ConnectionInfo> {
    let raw = cli.redis_url.as_deref().ok_or_else(|| {
        CommandError::MissingArgument(format!(
            "connection string (set {REDIS_URL_ENV} or pass --redis-url)"
        ))
    })?;

    Ok(ConnectionInfo::parse(raw)?.with_tls(!cli.no_tls))
}

const fn connect_options(cli: &Cli) -> ConnectOptions {
    ConnectOptions {
        timeout: Duration::from_secs(cli.timeout),
        insecure: cli.insecure,
    }
}

// ==================== Command Implementations ====================

fn cmd_store(cli: &Cli, args: &StoreArgs, format: OutputFormat) -> Result<String> {
    let spec = args.to_spec();
    spec.validate()?;

    let info = connection_info(cli)?;
    let blob = read_model(&args.file)?;

    let mut store = RedisModelStore::connect(&info, &connect_options(cli))?;
    let report = register_model(&mut store, &spec, &blob, args.verify)?;

    Ok(format_registration(&report, format))
}

fn cmd_upload(cli: &Cli, args: &UploadArgs, format: OutputFormat) -> Result<String> {
    let info = connection_info(cli)?;
    let blob = read_model(&args.file)?;

    let mut store = RedisModelStore::connect(&info, &connect_options(cli))?;
    let report = upload_encoded(&mut store, &args.key, &blob, args.verify)?;

    Ok(format_upload(&report, format))
}

fn cmd_inspect_url(cli: &Cli, format: OutputFormat) -> Result<String> {
    let info = connection_info(cli)?;
    Ok(format_connection(&info, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectionError, Error, IoError};
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["redisai-loader"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_connection_info_forces_tls() {
        let info = connection_info(&cli(&["--redis-url", "redis://:pass123@myhost:6379"])).unwrap();
        assert!(info.tls);
        assert_eq!(info.host, "myhost");

        let info = connection_info(&cli(&[
            "--redis-url",
            "redis://:pass123@myhost:6379",
            "--no-tls",
        ]))
        .unwrap();
        assert!(!info.tls);
    }

    #[test]
    fn test_missing_connection_string() {
        let mut parsed = cli(&[]);
        parsed.redis_url = None;
        let err = connection_info(&parsed).unwrap_err();
        assert!(matches!(err, Error::Command(CommandError::MissingArgument(_))));
    }

    #[test]
    fn test_store_missing_file_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("career_model.pt");
        let parsed = cli(&[
            "--redis-url",
            "redis://:pw@127.0.0.1:1",
            "store",
            "--file",
            missing.to_str().unwrap(),
        ]);
        let err = execute(&parsed).unwrap_err();
        assert!(matches!(err, Error::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_store_bad_url() {
        let parsed = cli(&["--redis-url", "http://myhost", "store"]);
        let err = execute(&parsed).unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_store_invalid_spec_rejected_early() {
        let parsed = cli(&["--redis-url", "redis://myhost", "store", "--backend", "TF"]);
        let err = execute(&parsed).unwrap_err();
        assert!(matches!(err, Error::InvalidSpec { .. }));
    }

    #[test]
    fn test_inspect_url() {
        let parsed = cli(&[
            "--redis-url",
            "redis://:pass123@myhost:6379",
            "--format",
            "json",
            "inspect-url",
        ]);
        let output = execute(&parsed).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["host"], "myhost");
        assert_eq!(value["port"], 6379);
        assert_eq!(value["tls"], true);
        assert!(!output.contains("pass123"));
    }
}
