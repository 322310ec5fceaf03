//! Sniffcheck - ruleset registration and token-listener dispatch.
//!
//! Sniffs are small rule checks that ask to be called for particular token
//! kinds. A ruleset validates the sniffs, filters each one down to the
//! tokenizers it supports, and builds a listener map. Scanning a file then
//! walks its tokens and calls the listening sniffs in registration order.
//!
//! # Architecture
//!
//! - `tokenizer`: tokenizer registry, tokens, tree-sitter token sources
//! - `sniff`: the `Sniff` trait, sniff codes and definitions
//! - `ruleset`: loading, tokenizer filtering, the listener map
//! - `scan`: per-file dispatch, suppressions, reports
//! - `standards`: built-in sniffs
//!
//! # Example
//!
//! ```no_run
//! use sniffcheck::{builtin_sniffs, Ruleset, RulesetConfig, Scanner, TokenizerRegistry};
//!
//! let ruleset = Ruleset::load(
//!     TokenizerRegistry::builtin(),
//!     &RulesetConfig::default(),
//!     builtin_sniffs(),
//! )?;
//! let report = Scanner::new(&ruleset).scan_file("src/app.js".as_ref())?;
//! for v in &report.violations {
//!     println!("{}:{}:{} {} [{}]", v.file, v.line, v.column, v.message, v.source);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ruleset;
pub mod scan;
pub mod sniff;
pub mod standards;
pub mod tokenizer;

pub use ruleset::{ConfigWarning, ListenerMap, LoadError, Ruleset, RulesetConfig, SniffId};
pub use scan::{
    CancelToken, FileReport, FileScan, ScanError, ScanState, ScanSummary, Scanner, Severity,
    Violation, ViolationKind,
};
pub use sniff::{Finding, Interest, Sniff, SniffCode, SniffContext, SniffDefinition, SniffOutcome};
pub use standards::builtin_sniffs;
pub use tokenizer::{Token, TokenSource, TokenSources, TokenizerId, TokenizerRegistry};
