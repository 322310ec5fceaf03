//! Core types for scan results.

use serde::{Deserialize, Serialize};

use super::SuppressedViolation;
use crate::tokenizer::TokenizerId;

/// Severity levels for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Where a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Reported by a sniff.
    #[serde(rename = "finding")]
    Finding,
    /// The sniff itself failed while processing a token.
    #[serde(rename = "internal-error")]
    InternalError,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Finding => "finding",
            ViolationKind::InternalError => "internal-error",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Code of the sniff that produced the violation.
    pub sniff: String,
    /// Sniff code plus the finding's own suffix, e.g. `Generic.Commenting.Todo.TaskFound`.
    pub source: String,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
}

impl Violation {
    pub fn is_internal_error(&self) -> bool {
        self.kind == ViolationKind::InternalError
    }
}

/// Lifecycle of a single file scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    NotStarted,
    Scanning,
    Completed,
    /// Stopped at a token boundary because cancellation was requested.
    Cancelled,
}

/// Results of scanning one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub tokenizer: TokenizerId,
    pub violations: Vec<Violation>,
    /// Violations that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<SuppressedViolation>,
    /// Number of tokens delivered to the dispatch loop
    pub tokens_scanned: usize,
    pub state: ScanState,
}

impl FileReport {
    pub fn new(file: impl Into<String>, tokenizer: TokenizerId) -> Self {
        Self {
            file: file.into(),
            tokenizer,
            violations: Vec::new(),
            suppressed: Vec::new(),
            tokens_scanned: 0,
            state: ScanState::NotStarted,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn was_cancelled(&self) -> bool {
        self.state == ScanState::Cancelled
    }

    fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

/// Aggregated results of scanning several files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files: Vec<FileReport>,
    /// Files that could not be scanned, with the reason
    #[serde(default)]
    pub skipped: Vec<(String, String)>,
}

impl ScanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, report: FileReport) {
        self.files.push(report);
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: ScanSummary) {
        self.files.extend(other.files);
        self.skipped.extend(other.skipped);
    }

    /// Number of files scanned.
    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> + '_ {
        self.files.iter().flat_map(|f| f.violations.iter())
    }

    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }

    pub fn suppressed_count(&self) -> usize {
        self.files.iter().map(|f| f.suppressed.len()).sum()
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|f| f.has_errors())
    }
}
