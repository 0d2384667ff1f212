//! Diagnostic logging.
//!
//! Pipeline stages emit `tracing` events; this module installs the subscriber
//! that prints them. Diagnostics always go to stderr so stdout stays clean for
//! the result lines and `--json`.
//!
//! `RUST_LOG` wins over the level given on the command line. An unparseable
//! `RUST_LOG` is not fatal: the command-line level is used instead and a
//! warning is logged once the subscriber is up.

use tracing::warn;
use tracing_subscriber::EnvFilter;

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// `RUST_LOG` directives that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedDirectives {
    pub directives: String,
    pub reason: String,
}

/// Build the level filter from `rust_log` when it parses, `default_level` otherwise.
///
/// Fails only if `default_level` itself is not a valid directive.
pub fn build_filter(
    rust_log: Option<&str>,
    default_level: &str,
) -> Result<(EnvFilter, Option<RejectedDirectives>), InitError> {
    let rejected = match rust_log.filter(|d| !d.trim().is_empty()) {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(RejectedDirectives {
                directives: directives.to_string(),
                reason: e.to_string(),
            }),
        },
        None => None,
    };
    Ok((EnvFilter::try_new(default_level)?, rejected))
}

/// Install the global stderr subscriber.
///
/// Fails if `default_level` is not a valid filter directive or a subscriber
/// is already installed.
pub fn init_tracing(default_level: &str) -> Result<(), InitError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(rust_log.as_deref(), default_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()?;

    if let Some(rejected) = rejected {
        warn!(
            rust_log = %rejected.directives,
            reason = %rejected.reason,
            fallback = default_level,
            "ignoring invalid RUST_LOG"
        );
    }
    Ok(())
}
