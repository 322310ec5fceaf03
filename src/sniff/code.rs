//! Sniff codes: the dotted identity of a rule check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a sniff code was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid sniff code {code:?}: {reason}")]
pub struct InvalidSniffCode {
    pub code: String,
    pub reason: &'static str,
}

/// A sniff code of the form `Standard.Category.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SniffCode(String);

impl SniffCode {
    pub fn parse(code: &str) -> Result<Self, InvalidSniffCode> {
        let invalid = |reason| InvalidSniffCode {
            code: code.to_string(),
            reason,
        };

        let parts: Vec<&str> = code.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid("expected three dot-separated parts"));
        }
        for part in parts {
            if part.is_empty() {
                return Err(invalid("empty part"));
            }
            if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("parts may only contain letters, digits and '_'"));
            }
        }

        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn standard(&self) -> &str {
        self.part(0)
    }

    pub fn category(&self) -> &str {
        self.part(1)
    }

    pub fn name(&self) -> &str {
        self.part(2)
    }

    /// Whether `selector` names this sniff, its category or its standard.
    pub fn is_selected_by(&self, selector: &str) -> bool {
        matches_selector(selector, &self.0)
    }

    fn part(&self, index: usize) -> &str {
        self.0.split('.').nth(index).unwrap_or("")
    }
}

/// Whether `selector` equals `code` or is a whole-segment dotted prefix of it.
pub fn matches_selector(selector: &str, code: &str) -> bool {
    match code.strip_prefix(selector) {
        Some(rest) => !selector.is_empty() && (rest.is_empty() || rest.starts_with('.')),
        None => false,
    }
}

impl fmt::Display for SniffCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SniffCode {
    type Err = InvalidSniffCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SniffCode {
    type Error = InvalidSniffCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SniffCode> for String {
    fn from(code: SniffCode) -> Self {
        code.0
    }
}

impl AsRef<str> for SniffCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
