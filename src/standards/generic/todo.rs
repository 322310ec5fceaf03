//! TODO and FIXME markers left in comments.

use lazy_static::lazy_static;
use regex::Regex;

use crate::sniff::{Finding, Interest, Sniff, SniffContext, SniffOutcome};
use crate::tokenizer::COMMENT;

lazy_static! {
    /// Marker word followed by the task text.
    static ref MARKER_PATTERN: Regex =
        Regex::new(r"(?i)\b(TODO|FIXME)\b[\s:-]*(.*)").unwrap();
}

/// Warns about comments that refer to unfinished work.
pub struct Todo;

impl Todo {
    pub const CODE: &'static str = "Generic.Commenting.Todo";
}

impl Sniff for Todo {
    fn register(&self) -> Interest {
        Interest::tokens([COMMENT])
    }

    fn process(&self, ctx: &SniffContext<'_>, position: usize) -> anyhow::Result<SniffOutcome> {
        let Some(token) = ctx.token(position) else {
            return Ok(SniffOutcome::none());
        };
        let text = String::from_utf8_lossy(ctx.bytes(position));

        let mut outcome = SniffOutcome::none();
        let mut line_start = 0;
        for line in text.split_inclusive('\n') {
            for caps in MARKER_PATTERN.captures_iter(line) {
                let (Some(marker), Some(task)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let (kind, code) = if marker.as_str().eq_ignore_ascii_case("fixme") {
                    ("FIXME", "FixmeFound")
                } else {
                    ("TODO", "TaskFound")
                };

                let task = task.as_str().trim().trim_end_matches("*/").trim_end();
                let message = if task.is_empty() {
                    format!("Comment refers to a {} task", kind)
                } else {
                    format!("Comment refers to a {} task \"{}\"", kind, task)
                };
                outcome.push(
                    Finding::warning(message)
                        .code(code)
                        .at_offset(token.start + line_start + marker.start()),
                );
            }
            line_start += line.len();
        }

        Ok(outcome)
    }
}
