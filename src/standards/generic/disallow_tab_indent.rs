//! Tabs in line indentation.

use crate::sniff::{Finding, Interest, Sniff, SniffContext, SniffOutcome};
use crate::tokenizer::WHITESPACE;

/// Warns when a line is indented with tabs.
///
/// Only the indentation in front of code is checked; whitespace-only lines
/// and tabs inside a line are left alone.
pub struct DisallowTabIndent;

impl DisallowTabIndent {
    pub const CODE: &'static str = "Generic.WhiteSpace.DisallowTabIndent";
}

impl Sniff for DisallowTabIndent {
    fn register(&self) -> Interest {
        Interest::tokens([WHITESPACE])
    }

    fn process(&self, ctx: &SniffContext<'_>, position: usize) -> anyhow::Result<SniffOutcome> {
        let Some(token) = ctx.token(position) else {
            return Ok(SniffOutcome::none());
        };
        // Trailing whitespace at the end of the file indents nothing.
        if token.end >= ctx.source().len() {
            return Ok(SniffOutcome::none());
        }

        let bytes = ctx.bytes(position);
        let indent_start = match bytes.iter().rposition(|b| *b == b'\n') {
            Some(newline) => token.start + newline + 1,
            None if ctx.starts_line(position) => token.start,
            None => return Ok(SniffOutcome::none()),
        };

        let indent = &ctx.source()[indent_start..token.end];
        if !indent.contains(&b'\t') {
            return Ok(SniffOutcome::none());
        }

        let message = if indent.contains(&b' ') {
            "Spaces must be used to indent lines; tabs are not allowed (mixed tabs and spaces found)"
        } else {
            "Spaces must be used to indent lines; tabs are not allowed"
        };
        Ok(Finding::warning(message)
            .code("TabsUsed")
            .at_offset(indent_start)
            .into())
    }
}
