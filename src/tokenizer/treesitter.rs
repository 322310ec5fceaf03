//! Tree-sitter backed token sources.
//!
//! A tree-sitter parse is flattened into a token stream: every leaf node
//! becomes one token whose kind is the node kind, and the bytes between
//! leaves become `whitespace` (or `gap_text`) tokens, so the stream covers the
//! whole file.

use tree_sitter::{Language, Parser as TsParser, Tree};

use super::{Token, TokenSource, TokenStream, CSS, JS, PHP, WHITESPACE};

/// Token kind for non-whitespace bytes that no leaf node covers.
///
/// Distinct from grammar node kinds such as tree-sitter-php's `text`.
pub const GAP_TEXT: &str = "gap_text";

/// Token source for one tree-sitter grammar.
pub struct TreeSitterSource {
    language: Language,
    tokenizer: &'static str,
    extensions: &'static [&'static str],
}

impl TreeSitterSource {
    /// Create a source from a grammar.
    pub fn new(
        language: Language,
        tokenizer: &'static str,
        extensions: &'static [&'static str],
    ) -> Self {
        Self {
            language,
            tokenizer,
            extensions,
        }
    }

    pub fn php() -> Self {
        Self::new(tree_sitter_php::LANGUAGE_PHP.into(), PHP, &["php", "phtml"])
    }

    pub fn javascript() -> Self {
        Self::new(
            tree_sitter_javascript::LANGUAGE.into(),
            JS,
            &["js", "mjs", "cjs", "jsx"],
        )
    }

    pub fn css() -> Self {
        Self::new(tree_sitter_css::LANGUAGE.into(), CSS, &["css"])
    }

    fn parse(&self, source: &[u8]) -> anyhow::Result<Tree> {
        let mut parser = TsParser::new();
        parser.set_language(&self.language)?;
        parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse {} source", self.tokenizer))
    }
}

impl TokenSource for TreeSitterSource {
    fn tokenizer(&self) -> &str {
        self.tokenizer
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn tokenize<'a>(&'a self, source: &'a [u8]) -> anyhow::Result<TokenStream<'a>> {
        let tree = self.parse(source)?;
        Ok(Box::new(flatten(&tree, source).into_iter()))
    }
}

/// Collect leaf tokens in document order, filling the gaps between them.
fn flatten(tree: &Tree, source: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut cursor = tree.walk();

    'walk: loop {
        let node = cursor.node();
        if node.child_count() == 0 {
            let (start, end) = (node.start_byte(), node.end_byte());
            // Zero-width leaves are inserted by error recovery.
            if end > start && start >= pos {
                push_gap(&mut tokens, source, pos, start);
                tokens.push(Token::new(node.kind(), start, end));
                pos = end;
            }
        } else if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    push_gap(&mut tokens, source, pos, source.len());
    tokens
}

/// Split `source[from..to]` into alternating whitespace and text tokens.
fn push_gap(tokens: &mut Vec<Token>, source: &[u8], from: usize, to: usize) {
    let mut start = from;
    while start < to {
        let is_space = source[start].is_ascii_whitespace();
        let mut end = start + 1;
        while end < to && source[end].is_ascii_whitespace() == is_space {
            end += 1;
        }
        tokens.push(Token::new(if is_space { WHITESPACE } else { GAP_TEXT }, start, end));
        start = end;
    }
}
