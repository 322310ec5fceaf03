//! The rule-check contract.

use super::SniffContext;
use crate::scan::Severity;

/// Which token kinds a sniff wants to be called for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interest {
    /// The listed token kinds. An empty list makes the sniff inert.
    Tokens(Vec<&'static str>),
    /// Every token, whatever its kind.
    AllTokens,
}

impl Interest {
    pub fn tokens<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Interest::Tokens(kinds.into_iter().collect())
    }

    pub fn none() -> Self {
        Interest::Tokens(Vec::new())
    }

    /// True if the sniff can never be invoked.
    pub fn is_empty(&self) -> bool {
        matches!(self, Interest::Tokens(kinds) if kinds.is_empty())
    }
}

/// A problem reported by a sniff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
    /// Suffix appended to the sniff code, e.g. `"Found"`.
    pub code: Option<String>,
    /// Token position the finding points at; defaults to the processed token.
    pub position: Option<usize>,
    /// Exact byte offset to report; wins over `position`.
    pub offset: Option<usize>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            code: None,
            position: None,
            offset: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Point at a byte inside a token, e.g. the indentation on its second line.
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// What a sniff returns for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SniffOutcome {
    pub findings: Vec<Finding>,
    /// Do not call this sniff again in this file before this token position.
    pub skip_to: Option<usize>,
}

impl SniffOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, finding: Finding) -> Self {
        self.findings.push(finding);
        self
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn skip_to(mut self, position: usize) -> Self {
        self.skip_to = Some(position);
        self
    }

    /// Do not call this sniff again for the rest of the file.
    pub fn skip_rest_of_file(self) -> Self {
        self.skip_to(usize::MAX)
    }
}

impl From<Finding> for SniffOutcome {
    fn from(finding: Finding) -> Self {
        SniffOutcome::none().with(finding)
    }
}

/// A pluggable rule check.
///
/// Declared metadata (code, supported tokenizers) lives in
/// [`SniffMeta`](super::SniffMeta); this trait is only the behaviour.
///
/// # Thread Safety
///
/// A loaded ruleset may be shared by several scanning threads, so sniffs
/// must not rely on interior mutability for per-file state.
pub trait Sniff: Send + Sync {
    /// Token kinds this sniff listens for. Called once, at load time.
    fn register(&self) -> Interest;

    /// Process the token at `position`.
    ///
    /// Errors are reported as `internal-error` violations attributed to
    /// this sniff; the scan carries on.
    fn process(&self, ctx: &SniffContext<'_>, position: usize) -> anyhow::Result<SniffOutcome>;
}
