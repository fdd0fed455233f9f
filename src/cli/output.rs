//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::ConnectionInfo;
use crate::error::Error;
use crate::loader::{RegistrationReport, UploadReport, Verification};
use serde::Serialize;
use std::fmt::Write;

/// Prefix of the line printed after a successful registration.
pub const SUCCESS_LINE: &str = "✅ Model loaded successfully";

/// Prefix of the line printed when anything fails.
pub const ERROR_PREFIX: &str = "❌ Error loading model";

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the result of `store`.
#[must_use]
pub fn format_registration(report: &RegistrationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{SUCCESS_LINE}");
            push_verification(&mut output, &report.verification);
            output
        }
        OutputFormat::Json => format_json(&Success {
            status: "ok",
            result: report,
        }),
    }
}

/// Formats the result of `upload`.
#[must_use]
pub fn format_upload(report: &UploadReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "{SUCCESS_LINE}: {} ({}, {} encoded{})",
                report.key,
                format_size(report.bytes),
                format_size(report.encoded_bytes),
                if report.overwritten { ", overwritten" } else { "" }
            );
            push_verification(&mut output, &report.verification);
            output
        }
        OutputFormat::Json => format_json(&Success {
            status: "ok",
            result: report,
        }),
    }
}

/// Formats a parsed connection string. The password is never shown.
#[must_use]
pub fn format_connection(info: &ConnectionInfo, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Target:   {}", info.redacted());
            let _ = writeln!(output, "  Host:     {}", info.host);
            let _ = writeln!(output, "  Port:     {}", info.port);
            let _ = writeln!(output, "  Database: {}", info.db);
            let _ = writeln!(
                output,
                "  User:     {}",
                info.username.as_deref().unwrap_or("-")
            );
            let _ = writeln!(
                output,
                "  Password: {}",
                if info.password.is_some() { "set" } else { "none" }
            );
            let _ = writeln!(output, "  TLS:      {}", if info.tls { "yes" } else { "no" });
            output
        }
        OutputFormat::Json => format_json(info),
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{ERROR_PREFIX}: {error}"),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": "error",
                "error": error.to_string(),
            });
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| error.to_string())
        }
    }
}

#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    result: &'a T,
}

fn push_verification(output: &mut String, verification: &Verification) {
    match verification {
        Verification::Skipped => {}
        Verification::Passed => output.push_str("  Verification passed\n"),
        Verification::Mismatch(reason) => {
            let _ = writeln!(output, "  ⚠️ Verification mismatch: {reason}");
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
