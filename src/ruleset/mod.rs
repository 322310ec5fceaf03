//! Ruleset loading: sniff validation, tokenizer filtering, listener map.
//!
//! # Loading
//!
//! ```text
//! ┌──────────────────┐   ┌───────────────────┐   ┌──────────────┐
//! │ SniffDefinitions │──▶│ validate code,    │──▶│ descriptors  │
//! └──────────────────┘   │ instantiate,      │   └──────┬───────┘
//!                        │ resolve tokenizers│          │
//!                        └─────────┬─────────┘          ▼
//!                                  │             ┌──────────────┐
//!                                  ▼             │ ListenerMap  │
//!                           ConfigWarnings       └──────────────┘
//! ```
//!
//! Unrecognized tokenizer names are warnings, not errors: the sniff keeps
//! its recognized tokenizers, or becomes inert if none are left. Only a
//! sniff that cannot be loaded at all fails the ruleset.

mod config;
mod descriptor;
mod listeners;

pub use config::RulesetConfig;
pub use descriptor::{resolve_tokenizers, ResolvedTokenizers, SniffDescriptor};
pub use listeners::{ListenerMap, Listeners, SniffId, TokenizerListeners};

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::sniff::{InvalidSniffCode, SniffCode, SniffDefinition};
use crate::tokenizer::TokenizerRegistry;

/// Errors that abort ruleset loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    InvalidCode(#[from] InvalidSniffCode),
    #[error("sniff {0} is defined more than once")]
    Duplicate(SniffCode),
    #[error("failed to instantiate sniff {code}: {source}")]
    Instantiate {
        code: SniffCode,
        #[source]
        source: anyhow::Error,
    },
    #[error("invalid exclude pattern {pattern:?} for sniff {code}: {source}")]
    InvalidPattern {
        code: SniffCode,
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("sniff {code} supports none of its declared tokenizers ({declared})")]
    NoSupportedTokenizers { code: SniffCode, declared: String },
}

/// A sniff declared a tokenizer the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub sniff: SniffCode,
    pub tokenizer: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sniff {} lists unrecognized tokenizer {:?}; it will not run for that tokenizer",
            self.sniff, self.tokenizer
        )
    }
}

/// A loaded, validated set of sniffs and the listener map built from them.
///
/// Immutable after [`Ruleset::load`]; share it by reference across scans.
pub struct Ruleset {
    descriptors: Vec<SniffDescriptor>,
    listeners: ListenerMap,
    warnings: Vec<ConfigWarning>,
}

impl Ruleset {
    /// Load sniffs in the given order.
    pub fn load<I>(
        registry: &TokenizerRegistry,
        config: &RulesetConfig,
        definitions: I,
    ) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = SniffDefinition>,
    {
        let mut descriptors: Vec<SniffDescriptor> = Vec::new();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for definition in definitions {
            let code = SniffCode::parse(definition.code())?;
            if !config.is_selected(&code) {
                debug!(sniff = %code, "sniff not selected by ruleset config");
                continue;
            }
            if !seen.insert(code.clone()) {
                return Err(LoadError::Duplicate(code));
            }

            let (meta, instance) = definition.instantiate();
            let sniff = instance.map_err(|source| LoadError::Instantiate {
                code: code.clone(),
                source,
            })?;

            let resolved = resolve_tokenizers(registry, &meta.supported_tokenizers);
            for name in &resolved.unrecognized {
                let warning = ConfigWarning {
                    sniff: code.clone(),
                    tokenizer: name.clone(),
                };
                warn!(sniff = %code, tokenizer = %name, "{}", warning);
                warnings.push(warning);
            }

            if config.strict_tokenizers
                && resolved.active.is_empty()
                && !meta.supported_tokenizers.is_empty()
            {
                return Err(LoadError::NoSupportedTokenizers {
                    code,
                    declared: meta.supported_tokenizers.join(", "),
                });
            }

            let exclude = descriptor::build_exclude_set(&code, &config.patterns_for(&code))?;
            let interest = sniff.register();

            descriptors.push(SniffDescriptor {
                id: SniffId(descriptors.len()),
                code,
                declared_tokenizers: meta.supported_tokenizers,
                tokenizers: resolved.active,
                interest,
                exclude,
                sniff,
            });
        }

        let listeners = build_listener_map(&descriptors);
        let ruleset = Self {
            descriptors,
            listeners,
            warnings,
        };

        for descriptor in ruleset.inert_sniffs() {
            debug!(sniff = %descriptor.code(), "sniff is inert: no tokenizer/token bindings");
        }
        debug!(
            sniffs = ruleset.len(),
            warnings = ruleset.warnings.len(),
            "ruleset loaded"
        );

        Ok(ruleset)
    }

    pub fn descriptors(&self) -> &[SniffDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: SniffId) -> &SniffDescriptor {
        &self.descriptors[id.0]
    }

    /// Find a loaded sniff by code.
    pub fn find(&self, code: &str) -> Option<&SniffDescriptor> {
        self.descriptors.iter().find(|d| d.code.as_str() == code)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Configuration warnings raised while loading, in load order.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn listener_map(&self) -> &ListenerMap {
        &self.listeners
    }

    /// Rebuild the listener map from the loaded descriptors.
    ///
    /// The result is structurally identical to [`Ruleset::listener_map`].
    pub fn build_listener_map(&self) -> ListenerMap {
        build_listener_map(&self.descriptors)
    }

    /// Whether the sniff is loaded but bound to no (tokenizer, token) pair.
    ///
    /// Returns `false` for codes that are not loaded at all.
    pub fn is_inert(&self, code: &str) -> bool {
        self.find(code)
            .map(|d| self.listeners.references(d.id) == 0)
            .unwrap_or(false)
    }

    /// Loaded sniffs that can never be invoked.
    pub fn inert_sniffs(&self) -> Vec<&SniffDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| self.listeners.references(d.id) == 0)
            .collect()
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("descriptors", &self.descriptors)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

fn build_listener_map(descriptors: &[SniffDescriptor]) -> ListenerMap {
    ListenerMap::build(
        descriptors
            .iter()
            .map(|d| (d.id, d.tokenizers.as_slice(), &d.interest)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::{Interest, Sniff, SniffContext, SniffOutcome};

    struct Listens(Interest);

    impl Sniff for Listens {
        fn register(&self) -> Interest {
            self.0.clone()
        }

        fn process(&self, _ctx: &SniffContext<'_>, _position: usize) -> anyhow::Result<SniffOutcome> {
            Ok(SniffOutcome::none())
        }
    }

    fn definition(code: &str, tokenizers: &[&str], kinds: &[&'static str]) -> SniffDefinition {
        SniffDefinition::from_sniff(code, Listens(Interest::tokens(kinds.iter().copied())))
            .supported_tokenizers(tokenizers.iter().copied())
    }

    fn load(definitions: Vec<SniffDefinition>) -> Result<Ruleset, LoadError> {
        Ruleset::load(TokenizerRegistry::builtin(), &RulesetConfig::default(), definitions)
    }

    #[test]
    fn test_one_unrecognized_one_recognized() {
        let ruleset = load(vec![definition(
            "TestStandard.SupportedTokenizers.ListensForUnrecognizedTokenizers",
            &["SCSS", "JS"],
            &["whitespace"],
        )])
        .unwrap();

        let descriptor = ruleset.descriptors().first().unwrap();
        assert_eq!(
            ruleset.listener_map().listeners("JS", "whitespace"),
            vec![descriptor.id()]
        );
        assert_eq!(ruleset.warnings().len(), 1);
        assert_eq!(ruleset.warnings()[0].tokenizer, "SCSS");
        assert_eq!(ruleset.warnings()[0].sniff, *descriptor.code());
        assert!(!ruleset.is_inert(descriptor.code().as_str()));
    }

    #[test]
    fn test_empty_declaration_registers_everywhere() {
        let ruleset = load(vec![definition("Generic.Files.Any", &[], &["comment"])]).unwrap();
        let id = ruleset.descriptors()[0].id();
        for tokenizer in TokenizerRegistry::builtin().all() {
            assert_eq!(
                ruleset.listener_map().listeners(tokenizer.as_str(), "comment"),
                vec![id]
            );
        }
        assert!(ruleset.warnings().is_empty());
    }

    #[test]
    fn test_inert_when_nothing_recognized() {
        let ruleset = load(vec![definition(
            "TestStandard.SupportedTokenizers.AllUnknown",
            &["SCSS", "TypeScript"],
            &["whitespace"],
        )])
        .unwrap();

        assert_eq!(ruleset.len(), 1, "inert sniffs stay loaded");
        assert!(ruleset.is_inert("TestStandard.SupportedTokenizers.AllUnknown"));
        assert_eq!(ruleset.listener_map().references(ruleset.descriptors()[0].id()), 0);
        assert_eq!(ruleset.warnings().len(), 2);
    }

    #[test]
    fn test_no_interest_is_inert() {
        let ruleset = load(vec![definition("Generic.Files.Quiet", &["JS"], &[])]).unwrap();
        assert!(ruleset.is_inert("Generic.Files.Quiet"));
        assert!(!ruleset.is_inert("Generic.Files.NotLoaded"));
    }

    #[test]
    fn test_strict_tokenizers() {
        let config = RulesetConfig {
            strict_tokenizers: true,
            ..Default::default()
        };
        let err = Ruleset::load(
            TokenizerRegistry::builtin(),
            &config,
            vec![definition("Test.Strict.Unknown", &["SCSS"], &["comment"])],
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::NoSupportedTokenizers { .. }));
        assert!(err.to_string().contains("SCSS"));

        // A partially recognized list still loads.
        let ruleset = Ruleset::load(
            TokenizerRegistry::builtin(),
            &config,
            vec![definition("Test.Strict.Partial", &["SCSS", "CSS"], &["comment"])],
        )
        .unwrap();
        assert_eq!(ruleset.warnings().len(), 1);
    }

    #[test]
    fn test_fatal_load_errors() {
        let err = load(vec![definition("NotACode", &[], &["comment"])]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCode(_)));

        let err = load(vec![
            definition("Generic.Files.Twice", &[], &["comment"]),
            definition("Generic.Files.Twice", &[], &["comment"]),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::Duplicate(_)));

        let broken = SniffDefinition::new("Generic.Files.Broken", || {
            anyhow::bail!("missing dictionary file")
        });
        let err = load(vec![broken]).unwrap_err();
        assert!(matches!(err, LoadError::Instantiate { .. }));
        assert!(err.to_string().contains("missing dictionary file"));
    }

    #[test]
    fn test_config_filters_before_instantiation() {
        let config = RulesetConfig {
            exclude: vec!["Generic.Files.Broken".to_string()],
            ..Default::default()
        };
        let broken = SniffDefinition::new("Generic.Files.Broken", || {
            anyhow::bail!("should never be built")
        });
        let ruleset = Ruleset::load(
            TokenizerRegistry::builtin(),
            &config,
            vec![broken, definition("Generic.Files.Kept", &[], &["comment"])],
        )
        .unwrap();
        assert_eq!(ruleset.len(), 1);
        assert!(ruleset.find("Generic.Files.Kept").is_some());
        assert_eq!(ruleset.descriptors()[0].id().index(), 0);
    }

    #[test]
    fn test_synthetic_registry() {
        let registry = TokenizerRegistry::new(["GENERAL", "SCRIPT", "STYLE"]);
        let ruleset = Ruleset::load(
            &registry,
            &RulesetConfig::default(),
            vec![definition("Test.Synthetic.Script", &["FABRICATED", "SCRIPT"], &["word"])],
        )
        .unwrap();
        let id = ruleset.descriptors()[0].id();
        assert_eq!(ruleset.listener_map().listeners("SCRIPT", "word"), vec![id]);
        assert!(ruleset.listener_map().listeners("STYLE", "word").is_empty());
        assert_eq!(ruleset.warnings()[0].tokenizer, "FABRICATED");
    }
}
