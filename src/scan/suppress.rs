//! Inline suppression of violations via comments.
//!
//! Supports suppression comments like:
//! - `// sniffcheck:ignore <code> - <reason>`
//! - `# sniffcheck:ignore-next-line <code> - <reason>`
//! - `/* sniffcheck:ignore-file <code> - <reason> */`
//!
//! `<code>` is a sniff code, a dotted prefix of one (`Generic.WhiteSpace`),
//! a full violation source, or `*` for everything.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Violation;
use crate::sniff::matches_selector;
use crate::tokenizer::{Token, COMMENT};

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Code selector to suppress, or "*" for all
    pub code: String,
    /// Human-readable reason
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

/// A violation that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedViolation {
    pub violation: Violation,
    pub suppression: Suppression,
}

lazy_static::lazy_static! {
    /// Patterns for matching suppression comments.
    static ref SUPPRESSION_PATTERNS: Vec<Regex> = vec![
        // Block comment style: /* sniffcheck:... */
        Regex::new(r"/\*\s*sniffcheck:(ignore(?:-file|-next-line)?)\s+([^\s*]+)\s*(?:-\s*(.*?))?\s*\*/").unwrap(),
        // Line comment style: // sniffcheck:...
        Regex::new(r"//\s*sniffcheck:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap(),
        // Shell comment style: # sniffcheck:...
        Regex::new(r"#\s*sniffcheck:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap(),
    ];
}

/// Parse suppression directives from file content.
pub fn parse_suppressions(file_path: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;

        for pattern in SUPPRESSION_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let code = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let reason = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let suppression_type = match directive {
                "ignore-file" => SuppressionType::File,
                "ignore-next-line" => SuppressionType::NextLine,
                "ignore" => {
                    // Alone on its line it covers the next line; trailing code covers this one.
                    let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                    if line[..start].trim().is_empty() {
                        SuppressionType::NextLine
                    } else {
                        SuppressionType::Line
                    }
                }
                _ => continue,
            };

            suppressions.push(Suppression {
                code: code.to_string(),
                reason,
                file: file_path.to_string(),
                line: if suppression_type == SuppressionType::File {
                    0
                } else {
                    line_number
                },
                suppression_type,
            });
            break; // Only one suppression per line
        }
    }

    suppressions
}

/// The source with everything outside `comment` tokens masked out.
///
/// Masked bytes become `x` and whitespace is kept, so line numbers and the
/// code-before-directive check in [`parse_suppressions`] still hold.
pub fn comment_view(source: &[u8], tokens: &[Token]) -> String {
    let mut masked: Vec<u8> = source
        .iter()
        .map(|b| if b.is_ascii_whitespace() { *b } else { b'x' })
        .collect();

    for token in tokens.iter().filter(|t| t.kind == COMMENT) {
        if let (Some(dst), Some(src)) = (
            masked.get_mut(token.start..token.end),
            source.get(token.start..token.end),
        ) {
            dst.copy_from_slice(src);
        }
    }

    String::from_utf8_lossy(&masked).into_owned()
}

/// Check if a violation matches a suppression.
pub fn matches_suppression(violation: &Violation, suppression: &Suppression) -> bool {
    if violation.file != suppression.file {
        return false;
    }

    if suppression.code != "*"
        && !matches_selector(&suppression.code, &violation.source)
        && !matches_selector(&suppression.code, &violation.sniff)
    {
        return false;
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => violation.line == suppression.line,
        SuppressionType::NextLine => violation.line == suppression.line + 1,
    }
}

/// Separate violations into active and suppressed based on suppressions.
///
/// Internal errors always stay active.
pub fn filter_suppressed(
    violations: Vec<Violation>,
    suppressions: &[Suppression],
) -> (Vec<Violation>, Vec<SuppressedViolation>) {
    if suppressions.is_empty() {
        return (violations, Vec::new());
    }

    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for violation in violations {
        if violation.is_internal_error() {
            active.push(violation);
            continue;
        }
        match suppressions
            .iter()
            .find(|s| matches_suppression(&violation, s))
        {
            Some(suppression) => suppressed.push(SuppressedViolation {
                violation,
                suppression: suppression.clone(),
            }),
            None => active.push(violation),
        }
    }

    (active, suppressed)
}
