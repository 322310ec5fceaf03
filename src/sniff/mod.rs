//! Rule checks ("sniffs") and their declared metadata.
//!
//! A sniff is split in two:
//! - `SniffMeta`: plain data declared by the author (code, supported tokenizers)
//! - `Sniff` trait: the behaviour (declare interest, process a token)
//!
//! A `SniffDefinition` pairs the two and defers instantiation to ruleset
//! load time, so that a sniff that cannot be built fails the load.

mod code;
mod context;
mod traits;

pub use code::{matches_selector, InvalidSniffCode, SniffCode};
pub use context::SniffContext;
pub use traits::{Finding, Interest, Sniff, SniffOutcome};

/// Builds a sniff instance.
pub type SniffFactory = Box<dyn FnOnce() -> anyhow::Result<Box<dyn Sniff>> + Send>;

/// Metadata a sniff author declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffMeta {
    /// Unvalidated `Standard.Category.Name` code.
    pub code: String,
    /// Tokenizers the sniff supports, in declaration order. Empty means all.
    pub supported_tokenizers: Vec<String>,
}

/// A sniff waiting to be loaded into a ruleset.
pub struct SniffDefinition {
    pub meta: SniffMeta,
    factory: SniffFactory,
}

impl SniffDefinition {
    /// Define a sniff built lazily by `factory`.
    pub fn new<F>(code: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<Box<dyn Sniff>> + Send + 'static,
    {
        Self {
            meta: SniffMeta {
                code: code.into(),
                supported_tokenizers: Vec::new(),
            },
            factory: Box::new(factory),
        }
    }

    /// Define a sniff from an already-built instance.
    pub fn from_sniff<S>(code: impl Into<String>, sniff: S) -> Self
    where
        S: Sniff + 'static,
    {
        Self::new(code, move || Ok(Box::new(sniff) as Box<dyn Sniff>))
    }

    /// Declare the tokenizers this sniff supports.
    pub fn supported_tokenizers<I, S>(mut self, tokenizers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.supported_tokenizers = tokenizers.into_iter().map(Into::into).collect();
        self
    }

    pub fn code(&self) -> &str {
        &self.meta.code
    }

    /// Build the sniff instance.
    pub fn instantiate(self) -> (SniffMeta, anyhow::Result<Box<dyn Sniff>>) {
        let instance = (self.factory)();
        (self.meta, instance)
    }
}

impl std::fmt::Debug for SniffDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SniffDefinition")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
