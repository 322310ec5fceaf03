//! Per-file view handed to sniffs.

use crate::tokenizer::{LineIndex, Token, TokenizerId};

/// Read-only access to the file being scanned.
pub struct SniffContext<'a> {
    file: &'a str,
    tokenizer: &'a TokenizerId,
    source: &'a [u8],
    tokens: &'a [Token],
    lines: &'a LineIndex<'a>,
}

impl<'a> SniffContext<'a> {
    pub fn new(
        file: &'a str,
        tokenizer: &'a TokenizerId,
        source: &'a [u8],
        tokens: &'a [Token],
        lines: &'a LineIndex<'a>,
    ) -> Self {
        Self {
            file,
            tokenizer,
            source,
            tokens,
            lines,
        }
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    pub fn tokenizer(&self) -> &'a TokenizerId {
        self.tokenizer
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// The whole token table of the file.
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn token(&self, position: usize) -> Option<&'a Token> {
        self.tokens.get(position)
    }

    /// Raw bytes of the token at `position`.
    pub fn bytes(&self, position: usize) -> &'a [u8] {
        self.token(position)
            .and_then(|t| self.source.get(t.start..t.end))
            .unwrap_or(&[])
    }

    /// Text of the token at `position`; empty if it is not valid UTF-8.
    pub fn text(&self, position: usize) -> &'a str {
        std::str::from_utf8(self.bytes(position)).unwrap_or("")
    }

    /// 1-based (line, column) where the token at `position` starts.
    pub fn location(&self, position: usize) -> (usize, usize) {
        let offset = self
            .token(position)
            .map(|t| t.start)
            .unwrap_or(self.source.len());
        self.lines.location(offset)
    }

    /// 1-based (line, column) of a byte offset.
    pub fn offset_location(&self, offset: usize) -> (usize, usize) {
        self.lines.location(offset)
    }

    /// Whether the token at `position` starts a line.
    pub fn starts_line(&self, position: usize) -> bool {
        match self.token(position) {
            Some(t) => t.start == 0 || self.source.get(t.start - 1) == Some(&b'\n'),
            None => false,
        }
    }

    /// Position of the next token at or after `from` whose kind is not in `skip`.
    pub fn next_non(&self, skip: &[&str], from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !skip.contains(&self.tokens[i].kind))
    }

    /// Position of the next token at or after `from` with the given kind.
    pub fn find_next(&self, kind: &str, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.tokens[i].kind == kind)
    }
}
