//! Scanning files against a loaded ruleset.
//!
//! ```text
//!  path ──▶ Scanner ──▶ TokenSource ──tokens──▶ FileScan ──▶ FileReport
//!                                                  │
//!                              ListenerMap lookup ─┤
//!                                                  ▼
//!                                      Sniff::process(ctx, position)
//! ```
//!
//! A `FileScan` walks tokens in order and calls every listening sniff in
//! registration order. A sniff that errors or panics produces one
//! `internal-error` violation for that token; the scan keeps going.

mod dispatcher;
mod scanner;
mod suppress;
mod types;

use thiserror::Error;

pub use dispatcher::{CancelToken, FileScan, INTERNAL_ERROR_SOURCE};
pub use scanner::Scanner;
pub use suppress::{
    comment_view, filter_suppressed, matches_suppression, parse_suppressions, SuppressedViolation,
    Suppression, SuppressionType,
};
pub use types::{FileReport, ScanState, ScanSummary, Severity, Violation, ViolationKind};

/// Errors that stop a single file from being scanned.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no tokenizer handles {0}")]
    UnsupportedFile(String),

    #[error("no token source registered for tokenizer {0}")]
    UnknownTokenizer(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to tokenize {path}: {source:#}")]
    Tokenize {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("scan of {0} was already started")]
    AlreadyStarted(String),
}
