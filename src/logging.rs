//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout carries only the result line. `RUST_LOG`
//! overrides the level picked from `--verbose`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset and `--verbose` is off.
pub const DEFAULT_FILTER: &str = "redisai_loader=warn";

/// Filter used when `RUST_LOG` is unset and `--verbose` is on.
pub const VERBOSE_FILTER: &str = "redisai_loader=debug";

/// Installs the global subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
