//! Tokenizer registry and token stream sources.
//!
//! This module provides:
//! - `TokenizerRegistry`: the closed set of tokenizer identifiers the engine knows
//! - `TokenSource` trait: turns source bytes into a single-pass token stream
//! - `TokenSources`: extension-based lookup of token sources
//! - Tree-sitter token sources for PHP, JS and CSS (feature `tree-sitter`)

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

mod location;
#[cfg(feature = "tree-sitter")]
pub mod treesitter;

pub use location::LineIndex;

/// Identifier of the general-purpose language tokenizer.
pub const PHP: &str = "PHP";
/// Identifier of the script language tokenizer.
pub const JS: &str = "JS";
/// Identifier of the stylesheet language tokenizer.
pub const CSS: &str = "CSS";

/// Token kind emitted for runs of whitespace between other tokens.
pub const WHITESPACE: &str = "whitespace";
/// Token kind of comments; suppression directives are read only from these.
pub const COMMENT: &str = "comment";

/// Name of a tokenizer, e.g. `"PHP"` or `"JS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizerId(String);

impl TokenizerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TokenizerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenizerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

static BUILTIN_REGISTRY: Lazy<TokenizerRegistry> =
    Lazy::new(|| TokenizerRegistry::new([PHP, JS, CSS]));

/// The set of tokenizers the engine recognizes.
///
/// Immutable once built. Pass it by reference to anything that needs to
/// decide whether a tokenizer name is known; tests build synthetic
/// registries with [`TokenizerRegistry::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerRegistry {
    known: BTreeSet<TokenizerId>,
}

impl TokenizerRegistry {
    /// Create a registry from a list of tokenizer names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: names.into_iter().map(TokenizerId::new).collect(),
        }
    }

    /// The registry of tokenizers shipped with the engine (`PHP`, `JS`, `CSS`).
    pub fn builtin() -> &'static TokenizerRegistry {
        &BUILTIN_REGISTRY
    }

    /// Whether `name` is a recognized tokenizer. Matching is exact.
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Look up the canonical identifier for `name`.
    pub fn get(&self, name: &str) -> Option<&TokenizerId> {
        self.known.get(name)
    }

    /// All known tokenizers, in sorted order.
    pub fn all(&self) -> impl Iterator<Item = &TokenizerId> + '_ {
        self.known.iter()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// A single lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token type tag (e.g. `"comment"`, `"whitespace"`, `"{"`).
    pub kind: &'static str,
    /// Start byte offset (0-indexed).
    pub start: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end: usize,
}

impl Token {
    pub fn new(kind: &'static str, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finite, single-pass sequence of tokens for one file.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token> + 'a>;

/// Produces the token stream for one language.
///
/// Implementations must be cheap to share; the scanner keeps one instance
/// per tokenizer and calls it for every file of that language.
pub trait TokenSource: Send + Sync {
    /// The tokenizer this source implements (e.g. `"JS"`).
    fn tokenizer(&self) -> &str;

    /// File extensions (without dot) handled by this source.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Tokenize `source`.
    ///
    /// Returns an error only when the input cannot be tokenized at all.
    fn tokenize<'a>(&'a self, source: &'a [u8]) -> anyhow::Result<TokenStream<'a>>;

    /// Check if this source handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// A set of token sources, looked up by tokenizer or file extension.
#[derive(Default)]
pub struct TokenSources {
    sources: Vec<Box<dyn TokenSource>>,
}

impl TokenSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token sources compiled into this build.
    #[cfg(feature = "tree-sitter")]
    pub fn builtin() -> Self {
        let mut sources = Self::new();
        sources.register(Box::new(treesitter::TreeSitterSource::php()));
        sources.register(Box::new(treesitter::TreeSitterSource::javascript()));
        sources.register(Box::new(treesitter::TreeSitterSource::css()));
        sources
    }

    /// No tree-sitter grammars available; callers register their own sources.
    #[cfg(not(feature = "tree-sitter"))]
    pub fn builtin() -> Self {
        Self::new()
    }

    /// Add a source. A later source for the same tokenizer takes precedence.
    pub fn register(&mut self, source: Box<dyn TokenSource>) {
        self.sources.insert(0, source);
    }

    /// Get the source for a tokenizer.
    pub fn for_tokenizer(&self, tokenizer: &str) -> Option<&dyn TokenSource> {
        self.sources
            .iter()
            .find(|s| s.tokenizer() == tokenizer)
            .map(|s| s.as_ref())
    }

    /// Select a source from the file extension of `path`.
    pub fn for_path(&self, path: &Path) -> Option<&dyn TokenSource> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
        self.sources
            .iter()
            .find(|s| s.handles_extension(&ext))
            .map(|s| s.as_ref())
    }

    /// Tokenizers that have a registered source.
    pub fn tokenizers(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sources.iter().map(|s| s.tokenizer()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
