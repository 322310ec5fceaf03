//! Byte offset to line:column conversion.

/// Line start table for one source buffer.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a [u8],
    /// Byte offset of each line start.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.iter().enumerate() {
            if *b == b'\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to
    /// the end of the buffer.
    pub fn location(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset]
            .iter()
            .filter(|b| (**b & 0xC0) != 0x80)
            .count();

        (line + 1, column + 1)
    }

    /// The text of a 1-based line, without its terminator.
    pub fn line_text(&self, line: usize) -> &'a [u8] {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1)) else {
            return &[];
        };
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let text = &self.source[start..end];
        text.strip_suffix(b"\r").unwrap_or(text)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location() {
        let index = LineIndex::new(b"ab\ncd\n\xc3\xa9f");
        assert_eq!(index.location(0), (1, 1));
        assert_eq!(index.location(1), (1, 2));
        assert_eq!(index.location(3), (2, 1));
        assert_eq!(index.location(6), (3, 1));
        // 'f' follows a two-byte character
        assert_eq!(index.location(8), (3, 2));
        assert_eq!(index.location(100), (3, 3));
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new(b"one\r\ntwo\nthree");
        assert_eq!(index.line_text(1), b"one");
        assert_eq!(index.line_text(2), b"two");
        assert_eq!(index.line_text(3), b"three");
        assert_eq!(index.line_text(4), b"");
        assert_eq!(index.line_text(0), b"");
        assert_eq!(index.line_count(), 3);
    }
}
