//! Per-file dispatch of tokens to listening sniffs.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    comment_view, filter_suppressed, parse_suppressions, FileReport, ScanError, ScanState, Severity, Violation,
    ViolationKind,
};
use crate::ruleset::{Ruleset, SniffDescriptor};
use crate::sniff::{Finding, SniffContext, SniffOutcome};
use crate::tokenizer::{LineIndex, Token, TokenizerId};

/// Source reported for sniffs that fail while processing a token.
pub const INTERNAL_ERROR_SOURCE: &str = "Internal.Exception";

/// Shared flag that asks running scans to stop at the next token boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One scan of one file against a ruleset.
///
/// ```text
/// NotStarted ──run()──▶ Scanning ──▶ Completed
///                           │
///                           └──cancel──▶ Cancelled
/// ```
pub struct FileScan<'r> {
    ruleset: &'r Ruleset,
    file: String,
    tokenizer: TokenizerId,
    state: ScanState,
}

impl<'r> FileScan<'r> {
    pub fn new(ruleset: &'r Ruleset, file: impl Into<String>, tokenizer: TokenizerId) -> Self {
        Self {
            ruleset,
            file: file.into(),
            tokenizer,
            state: ScanState::NotStarted,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Drive `tokens` through the ruleset's listeners.
    ///
    /// The stream is drained into the file's token table first so sniffs can
    /// look at neighbouring tokens. A flag cancelled before the call stops the
    /// scan without pulling any token. A scan can only be run once.
    pub fn run<I>(
        &mut self,
        source: &[u8],
        tokens: I,
        cancel: &CancelToken,
    ) -> Result<FileReport, ScanError>
    where
        I: IntoIterator<Item = Token>,
    {
        if self.state != ScanState::NotStarted {
            return Err(ScanError::AlreadyStarted(self.file.clone()));
        }
        if cancel.is_cancelled() {
            let mut report = FileReport::new(self.file.clone(), self.tokenizer.clone());
            report.state = ScanState::Cancelled;
            self.state = ScanState::Cancelled;
            debug!(file = %self.file, "scan cancelled before start");
            return Ok(report);
        }
        self.state = ScanState::Scanning;

        let tokens: Vec<Token> = tokens.into_iter().collect();
        let lines = LineIndex::new(source);
        let ctx = SniffContext::new(&self.file, &self.tokenizer, source, &tokens, &lines);
        let mut report = FileReport::new(self.file.clone(), self.tokenizer.clone());

        let listeners = self
            .ruleset
            .listener_map()
            .for_tokenizer(self.tokenizer.as_str());
        let excluded: Vec<bool> = self
            .ruleset
            .descriptors()
            .iter()
            .map(|d| d.excludes_file(&self.file))
            .collect();
        // Per sniff: first position it may be called for again.
        let mut ignore_to = vec![0usize; self.ruleset.len()];
        let mut final_state = ScanState::Completed;

        for (position, token) in tokens.iter().enumerate() {
            if cancel.is_cancelled() {
                final_state = ScanState::Cancelled;
                break;
            }
            report.tokens_scanned += 1;

            let Some(listeners) = listeners else {
                continue;
            };
            for id in listeners.listeners(token.kind) {
                let slot = id.index();
                if excluded[slot] || ignore_to[slot] > position {
                    continue;
                }

                let descriptor = self.ruleset.descriptor(id);
                match invoke(descriptor, &ctx, position) {
                    Ok(outcome) => {
                        for finding in outcome.findings {
                            report
                                .violations
                                .push(finding_violation(descriptor, &ctx, position, finding));
                        }
                        if let Some(skip_to) = outcome.skip_to {
                            ignore_to[slot] = ignore_to[slot].max(skip_to);
                        }
                    }
                    Err(message) => {
                        warn!(
                            sniff = %descriptor.code(),
                            file = %self.file,
                            position,
                            "sniff failed: {}",
                            message
                        );
                        report
                            .violations
                            .push(internal_error(descriptor, &ctx, position, &message));
                    }
                }
            }
        }

        let suppressions = parse_suppressions(&self.file, &comment_view(source, &tokens));
        let (active, suppressed) = filter_suppressed(report.violations, &suppressions);
        report.violations = active;
        report.suppressed = suppressed;

        report.state = final_state;
        self.state = final_state;
        debug!(
            file = %self.file,
            tokenizer = %self.tokenizer,
            tokens = report.tokens_scanned,
            violations = report.violations.len(),
            state = ?final_state,
            "file scan finished"
        );

        Ok(report)
    }
}

/// Call the sniff, turning both errors and panics into a message.
fn invoke(
    descriptor: &SniffDescriptor,
    ctx: &SniffContext<'_>,
    position: usize,
) -> Result<SniffOutcome, String> {
    let sniff = descriptor.sniff();
    match catch_unwind(AssertUnwindSafe(|| sniff.process(ctx, position))) {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(err)) => Err(format!("{:#}", err)),
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("panicked: {}", detail))
        }
    }
}

fn finding_violation(
    descriptor: &SniffDescriptor,
    ctx: &SniffContext<'_>,
    position: usize,
    finding: Finding,
) -> Violation {
    let code = descriptor.code().as_str();
    let (line, column) = match finding.offset {
        Some(offset) => ctx.offset_location(offset),
        None => ctx.location(finding.position.unwrap_or(position)),
    };
    let source = match &finding.code {
        Some(suffix) => format!("{}.{}", code, suffix),
        None => code.to_string(),
    };

    Violation {
        kind: ViolationKind::Finding,
        sniff: code.to_string(),
        source,
        message: finding.message,
        file: ctx.file().to_string(),
        line,
        column,
        severity: finding.severity,
    }
}

fn internal_error(
    descriptor: &SniffDescriptor,
    ctx: &SniffContext<'_>,
    position: usize,
    message: &str,
) -> Violation {
    let (line, column) = ctx.location(position);
    Violation {
        kind: ViolationKind::InternalError,
        sniff: descriptor.code().to_string(),
        source: INTERNAL_ERROR_SOURCE.to_string(),
        message: format!(
            "An internal error occurred in sniff {} at token {}: {}",
            descriptor.code(),
            position,
            message
        ),
        file: ctx.file().to_string(),
        line,
        column,
        severity: Severity::Error,
    }
}
