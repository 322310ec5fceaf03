//! Ruleset configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sniff::SniffCode;

/// Options applied while loading a ruleset.
///
/// Every field accepts selectors: a full sniff code, or a dotted prefix
/// naming a whole category (`Generic.WhiteSpace`) or standard (`Generic`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RulesetConfig {
    /// Only load sniffs matching one of these selectors (empty: load all)
    #[serde(default)]
    pub sniffs: Vec<String>,
    /// Never load sniffs matching these selectors
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Glob patterns of file paths a sniff is not run on, keyed by selector
    #[serde(default)]
    pub exclude_patterns: BTreeMap<String, Vec<String>>,
    /// Fail the load when a sniff supports none of its declared tokenizers
    #[serde(default)]
    pub strict_tokenizers: bool,
}

impl RulesetConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let config: RulesetConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Whether the sniff survives the `sniffs` restriction and `exclude` list.
    pub fn is_selected(&self, code: &SniffCode) -> bool {
        if self.exclude.iter().any(|s| code.is_selected_by(s)) {
            return false;
        }
        self.sniffs.is_empty() || self.sniffs.iter().any(|s| code.is_selected_by(s))
    }

    /// All exclude patterns that apply to the sniff.
    pub fn patterns_for(&self, code: &SniffCode) -> Vec<&str> {
        self.exclude_patterns
            .iter()
            .filter(|(selector, _)| code.is_selected_by(selector))
            .flat_map(|(_, patterns)| patterns.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> SniffCode {
        SniffCode::parse(s).unwrap()
    }

    #[test]
    fn test_default_selects_everything() {
        let config = RulesetConfig::default();
        assert!(config.is_selected(&code("Generic.Files.LineLength")));
        assert!(config.patterns_for(&code("Generic.Files.LineLength")).is_empty());
    }

    #[test]
    fn test_restrict_and_exclude() {
        let config = RulesetConfig {
            sniffs: vec!["Generic".to_string()],
            exclude: vec!["Generic.Commenting".to_string()],
            ..Default::default()
        };
        assert!(config.is_selected(&code("Generic.WhiteSpace.DisallowTabIndent")));
        assert!(!config.is_selected(&code("Generic.Commenting.Todo")));
        assert!(!config.is_selected(&code("Squiz.WhiteSpace.ScopeIndent")));
    }

    #[test]
    fn test_from_yaml() {
        let config = RulesetConfig::from_yaml_str(
            r#"
sniffs:
  - Generic
exclude_patterns:
  Generic.WhiteSpace:
    - "**/vendor/**"
  Generic.WhiteSpace.DisallowTabIndent:
    - "*.min.js"
strict_tokenizers: true
"#,
        )
        .unwrap();

        assert!(config.strict_tokenizers);
        assert!(config.exclude.is_empty());
        let patterns = config.patterns_for(&code("Generic.WhiteSpace.DisallowTabIndent"));
        assert_eq!(patterns, vec!["**/vendor/**", "*.min.js"]);
        assert!(config
            .patterns_for(&code("Generic.Commenting.Todo"))
            .is_empty());
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(RulesetConfig::from_yaml_str("sniffs: 12").is_err());
    }
}
