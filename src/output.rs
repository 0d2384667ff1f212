//! CLI output formatting.
//!
//! Output is **information-first**: the source image leads, then indented
//! context lines for what happened to it. Formatting is kept separate from
//! printing so every line can be unit tested.
//!
//! # Output Format
//!
//! ```text
//! photos/cat.png
//!     Original: 1000x1356
//!     Resized: 200x271 (thumbnail decode)
//!     Written → photos/cat.png (48213 bytes)
//! ```
//!
//! With `--dry-run` the last line reads `Dry run → nothing written`.
//! With `--json` a single [`OutcomeSummary`] object is printed instead.
//!
//! Errors go to stderr as `error: …`, followed by one `caused by:` line per
//! underlying source.

use crate::imaging::{Dimensions, ResizeOutcome, ResizeStrategy};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

/// Machine-readable summary of one resize, printed by `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub source: String,
    pub original: Dimensions,
    pub output: Dimensions,
    pub strategy: ResizeStrategy,
    pub bytes: usize,
    pub written: bool,
}

impl OutcomeSummary {
    pub fn new(outcome: &ResizeOutcome, source: &Path) -> Self {
        Self {
            source: source.display().to_string(),
            original: outcome.original,
            output: outcome.output,
            strategy: outcome.strategy,
            bytes: outcome.encoded.len(),
            written: outcome.persisted_to.is_some(),
        }
    }
}

// ============================================================================
// Resize output
// ============================================================================

/// Format the result of a resize as display lines.
pub fn format_outcome(outcome: &ResizeOutcome, source: &Path) -> Vec<String> {
    let mut lines = vec![
        source.display().to_string(),
        format!("    Original: {}", outcome.original),
        format!(
            "    Resized: {} ({})",
            outcome.output,
            outcome.strategy.label()
        ),
    ];

    match &outcome.persisted_to {
        Some(path) => lines.push(format!(
            "    Written \u{2192} {} ({} bytes)",
            path.display(),
            outcome.encoded.len()
        )),
        None => lines.push("    Dry run \u{2192} nothing written".to_string()),
    }

    lines
}

/// Print resize output to stdout.
pub fn print_outcome(outcome: &ResizeOutcome, source: &Path) {
    for line in format_outcome(outcome, source) {
        println!("{}", line);
    }
}

/// Serialize the result of a resize as pretty JSON.
pub fn format_outcome_json(outcome: &ResizeOutcome, source: &Path) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&OutcomeSummary::new(outcome, source))
}

// ============================================================================
// Errors
// ============================================================================

/// Format an error and its chain of sources.
pub fn format_error(err: &(dyn Error + 'static)) -> Vec<String> {
    let mut lines = vec![format!("error: {}", err)];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("    caused by: {}", cause));
        source = cause.source();
    }
    lines
}

/// Print an error to stderr.
pub fn print_error(err: &(dyn Error + 'static)) {
    for line in format_error(err) {
        eprintln!("{}", line);
    }
}
