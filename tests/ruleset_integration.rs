//! Integration tests for ruleset loading and listener registration.
//!
//! Fixture sniffs mirror real-world mistakes: sniffs that list tokenizer
//! names this engine does not know.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sniffcheck::{
    CancelToken, FileScan, Interest, LoadError, Ruleset, RulesetConfig, Sniff, SniffContext,
    SniffDefinition, SniffOutcome, Token, TokenizerId, TokenizerRegistry,
};

/// Listens for whitespace and counts its invocations.
struct ListensForWhitespace {
    calls: Arc<AtomicUsize>,
}

impl Sniff for ListensForWhitespace {
    fn register(&self) -> Interest {
        Interest::tokens(["whitespace"])
    }

    fn process(&self, _ctx: &SniffContext<'_>, _position: usize) -> anyhow::Result<SniffOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SniffOutcome::none())
    }
}

fn whitespace_sniff(code: &str, tokenizers: &[&str], calls: &Arc<AtomicUsize>) -> SniffDefinition {
    SniffDefinition::from_sniff(
        code,
        ListensForWhitespace {
            calls: calls.clone(),
        },
    )
    .supported_tokenizers(tokenizers.iter().copied())
}

fn load(definitions: Vec<SniffDefinition>) -> Ruleset {
    Ruleset::load(
        TokenizerRegistry::builtin(),
        &RulesetConfig::default(),
        definitions,
    )
    .expect("ruleset should load")
}

fn whitespace_tokens() -> Vec<Token> {
    vec![
        Token::new("identifier", 0, 1),
        Token::new("whitespace", 1, 2),
        Token::new("identifier", 2, 3),
        Token::new("whitespace", 3, 4),
    ]
}

fn scan(ruleset: &Ruleset, tokenizer: &str) {
    FileScan::new(ruleset, "fixture", TokenizerId::from(tokenizer))
        .run(b"a b ", whitespace_tokens(), &CancelToken::new())
        .expect("scan should run");
}

#[test]
fn test_unrecognized_tokenizers_make_sniff_inert() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ruleset = load(vec![whitespace_sniff(
        "TestStandard.SupportedTokenizers.ListensForUnrecognizedTokenizers",
        &["SCSS", "TypeScript"],
        &calls,
    )]);

    assert_eq!(ruleset.len(), 1);
    assert!(ruleset.listener_map().is_empty());
    assert!(ruleset.is_inert("TestStandard.SupportedTokenizers.ListensForUnrecognizedTokenizers"));

    let names: Vec<&str> = ruleset
        .warnings()
        .iter()
        .map(|w| w.tokenizer.as_str())
        .collect();
    assert_eq!(names, vec!["SCSS", "TypeScript"]);

    for tokenizer in ["PHP", "JS", "CSS", "SCSS"] {
        scan(&ruleset, tokenizer);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_mixed_tokenizers_keep_recognized_one() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ruleset = load(vec![whitespace_sniff(
        "TestStandard.SupportedTokenizers.ListensForMixedTokenizers",
        &["SCSS", "JS"],
        &calls,
    )]);

    assert_eq!(ruleset.warnings().len(), 1);
    assert_eq!(ruleset.warnings()[0].tokenizer, "SCSS");
    assert_eq!(ruleset.listener_map().listeners("JS", "whitespace").len(), 1);
    assert!(ruleset.listener_map().listeners("PHP", "whitespace").is_empty());
    assert!(ruleset.listener_map().listeners("SCSS", "whitespace").is_empty());

    scan(&ruleset, "PHP");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    scan(&ruleset, "JS");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_declaration_registers_everywhere() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ruleset = load(vec![whitespace_sniff(
        "TestStandard.SupportedTokenizers.ListensEverywhere",
        &[],
        &calls,
    )]);

    assert!(ruleset.warnings().is_empty());
    let tokenizers: Vec<&str> = ruleset
        .listener_map()
        .tokenizers()
        .into_iter()
        .map(|t| t.as_str())
        .collect();
    assert_eq!(tokenizers, vec!["CSS", "JS", "PHP"]);

    for tokenizer in ["PHP", "JS", "CSS"] {
        scan(&ruleset, tokenizer);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[test]
fn test_listener_map_rebuild_is_identical() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ruleset = load(vec![
        whitespace_sniff("Test.Rebuild.First", &["JS", "SCSS"], &calls),
        whitespace_sniff("Test.Rebuild.Second", &[], &calls),
        whitespace_sniff("Test.Rebuild.Third", &["TypeScript"], &calls),
    ]);

    assert_eq!(ruleset.build_listener_map(), *ruleset.listener_map());
    assert_eq!(ruleset.inert_sniffs().len(), 1);
    assert_eq!(ruleset.warnings().len(), 2);
}

#[test]
fn test_strict_mode_rejects_unsupported_sniff() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = RulesetConfig {
        strict_tokenizers: true,
        ..Default::default()
    };

    let err = Ruleset::load(
        TokenizerRegistry::builtin(),
        &config,
        vec![whitespace_sniff("Test.Strict.Unsupported", &["SCSS"], &calls)],
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::NoSupportedTokenizers { .. }));
    assert!(err.to_string().contains("SCSS"));
}

#[test]
fn test_ruleset_shared_across_threads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ruleset = load(vec![whitespace_sniff("Test.Threads.Shared", &["JS"], &calls)]);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| scan(&ruleset, "JS"));
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 8);
}
