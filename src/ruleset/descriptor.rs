//! Loaded sniffs and supported-tokenizer resolution.

use globset::{Glob, GlobSet, GlobSetBuilder};

use super::{LoadError, SniffId};
use crate::sniff::{Interest, Sniff, SniffCode};
use crate::tokenizer::{TokenizerId, TokenizerRegistry};

/// One sniff as loaded into a ruleset.
pub struct SniffDescriptor {
    pub(super) id: SniffId,
    pub(super) code: SniffCode,
    pub(super) declared_tokenizers: Vec<String>,
    pub(super) tokenizers: Vec<TokenizerId>,
    pub(super) interest: Interest,
    pub(super) exclude: Option<GlobSet>,
    pub(super) sniff: Box<dyn Sniff>,
}

impl SniffDescriptor {
    pub fn id(&self) -> SniffId {
        self.id
    }

    pub fn code(&self) -> &SniffCode {
        &self.code
    }

    /// Tokenizers exactly as the sniff declared them.
    pub fn declared_tokenizers(&self) -> &[String] {
        &self.declared_tokenizers
    }

    /// Recognized tokenizers the sniff is registered for.
    pub fn tokenizers(&self) -> &[TokenizerId] {
        &self.tokenizers
    }

    pub fn interest(&self) -> &Interest {
        &self.interest
    }

    /// Whether the sniff's exclude patterns match `path`.
    pub fn excludes_file(&self, path: &str) -> bool {
        self.exclude
            .as_ref()
            .map(|set| set.is_match(path))
            .unwrap_or(false)
    }

    pub(crate) fn sniff(&self) -> &dyn Sniff {
        self.sniff.as_ref()
    }
}

impl std::fmt::Debug for SniffDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SniffDescriptor")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("declared_tokenizers", &self.declared_tokenizers)
            .field("tokenizers", &self.tokenizers)
            .field("interest", &self.interest)
            .finish_non_exhaustive()
    }
}

/// A declared tokenizer list split against the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTokenizers {
    /// Recognized tokenizers, in declaration order, without repeats.
    pub active: Vec<TokenizerId>,
    /// Names the registry does not know, in declaration order, without repeats.
    pub unrecognized: Vec<String>,
}

/// Resolve a declared tokenizer list. An empty list means every known tokenizer.
pub fn resolve_tokenizers(registry: &TokenizerRegistry, declared: &[String]) -> ResolvedTokenizers {
    let mut resolved = ResolvedTokenizers::default();

    if declared.is_empty() {
        resolved.active = registry.all().cloned().collect();
        return resolved;
    }

    for name in declared {
        match registry.get(name) {
            Some(id) => {
                if !resolved.active.contains(id) {
                    resolved.active.push(id.clone());
                }
            }
            None => {
                if !resolved.unrecognized.contains(name) {
                    resolved.unrecognized.push(name.clone());
                }
            }
        }
    }

    resolved
}

/// Compile exclude patterns; `None` when there are none.
pub(super) fn build_exclude_set(
    code: &SniffCode,
    patterns: &[&str],
) -> Result<Option<GlobSet>, LoadError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| LoadError::InvalidPattern {
            code: code.clone(),
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|source| LoadError::InvalidPattern {
            code: code.clone(),
            pattern: patterns.join(", "),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_declaration_means_all() {
        let registry = TokenizerRegistry::builtin();
        let resolved = resolve_tokenizers(registry, &[]);
        assert_eq!(resolved.active.len(), registry.len());
        assert!(resolved.unrecognized.is_empty());
    }

    #[test]
    fn test_partition() {
        let registry = TokenizerRegistry::builtin();
        let resolved = resolve_tokenizers(registry, &declared(&["SCSS", "JS", "JS", "SCSS", "PHP"]));
        assert_eq!(
            resolved.active,
            vec![TokenizerId::from("JS"), TokenizerId::from("PHP")]
        );
        assert_eq!(resolved.unrecognized, vec!["SCSS".to_string()]);
    }

    #[test]
    fn test_all_unrecognized() {
        let registry = TokenizerRegistry::builtin();
        let resolved = resolve_tokenizers(registry, &declared(&["SCSS", "TypeScript"]));
        assert!(resolved.active.is_empty());
        assert_eq!(resolved.unrecognized, declared(&["SCSS", "TypeScript"]));
    }

    #[test]
    fn test_exclude_set() {
        let code = SniffCode::parse("Generic.Files.Sample").unwrap();
        assert!(build_exclude_set(&code, &[]).unwrap().is_none());

        let set = build_exclude_set(&code, &["**/vendor/**", "*.min.js"])
            .unwrap()
            .unwrap();
        assert!(set.is_match("src/vendor/lib.js"));
        assert!(set.is_match("app.min.js"));
        assert!(!set.is_match("src/app.js"));

        let err = build_exclude_set(&code, &["a[b"]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidPattern { .. }));
    }
}
