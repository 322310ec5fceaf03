//! The listener map: (tokenizer, token kind) -> sniffs to invoke.

use std::collections::HashMap;
use std::iter::Peekable;
use std::slice;

use crate::sniff::Interest;
use crate::tokenizer::TokenizerId;

/// Position of a sniff in its ruleset; also its registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SniffId(pub(crate) usize);

impl SniffId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Listeners registered under one tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerListeners {
    by_kind: HashMap<&'static str, Vec<SniffId>>,
    /// Sniffs interested in every token.
    all_tokens: Vec<SniffId>,
}

impl TokenizerListeners {
    /// Sniffs to invoke for a token of `kind`, in registration order.
    pub fn listeners(&self, kind: &str) -> Listeners<'_> {
        let specific = self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[]);
        Listeners {
            specific: specific.iter().peekable(),
            all_tokens: self.all_tokens.iter().peekable(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all_tokens.is_empty() && self.by_kind.is_empty()
    }

    fn add(&mut self, id: SniffId, interest: &Interest) {
        match interest {
            Interest::AllTokens => push_once(&mut self.all_tokens, id),
            Interest::Tokens(kinds) => {
                for kind in kinds {
                    push_once(self.by_kind.entry(*kind).or_default(), id);
                }
            }
        }
    }

    fn references(&self, id: SniffId) -> usize {
        let specific = self.by_kind.values().filter(|ids| ids.contains(&id)).count();
        specific + usize::from(self.all_tokens.contains(&id))
    }
}

/// Ids are added in ascending order, so a repeat can only be the last entry.
fn push_once(ids: &mut Vec<SniffId>, id: SniffId) {
    if ids.last() != Some(&id) {
        ids.push(id);
    }
}

/// Merges kind-specific and all-token listeners back into registration order.
pub struct Listeners<'a> {
    specific: Peekable<slice::Iter<'a, SniffId>>,
    all_tokens: Peekable<slice::Iter<'a, SniffId>>,
}

impl Iterator for Listeners<'_> {
    type Item = SniffId;

    fn next(&mut self) -> Option<SniffId> {
        let specific = self.specific.peek().copied().copied();
        let all_tokens = self.all_tokens.peek().copied().copied();
        match (specific, all_tokens) {
            (Some(a), Some(b)) if b < a => self.all_tokens.next().copied(),
            (Some(_), _) => self.specific.next().copied(),
            (None, _) => self.all_tokens.next().copied(),
        }
    }
}

/// Read-only index from (tokenizer, token kind) to interested sniffs.
///
/// Built once per ruleset load and shared by every file scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerMap {
    tokenizers: HashMap<TokenizerId, TokenizerListeners>,
}

impl ListenerMap {
    /// Build the map from `(sniff, active tokenizers, interest)` entries.
    ///
    /// Entries must come in registration order.
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SniffId, &'a [TokenizerId], &'a Interest)>,
    {
        let mut map = Self::default();
        for (id, tokenizers, interest) in entries {
            if interest.is_empty() {
                continue;
            }
            for tokenizer in tokenizers {
                map.tokenizers
                    .entry(tokenizer.clone())
                    .or_default()
                    .add(id, interest);
            }
        }
        map
    }

    /// All listeners for one tokenizer, if any sniff is registered for it.
    pub fn for_tokenizer(&self, tokenizer: &str) -> Option<&TokenizerListeners> {
        self.tokenizers.get(tokenizer).filter(|l| !l.is_empty())
    }

    /// Sniffs to invoke for `(tokenizer, kind)`; empty if there are none.
    pub fn listeners(&self, tokenizer: &str, kind: &str) -> Vec<SniffId> {
        self.for_tokenizer(tokenizer)
            .map(|l| l.listeners(kind).collect())
            .unwrap_or_default()
    }

    /// Number of entries referencing `id`, wildcard entries counted once per tokenizer.
    pub fn references(&self, id: SniffId) -> usize {
        self.tokenizers.values().map(|l| l.references(id)).sum()
    }

    /// Tokenizers with at least one listener, sorted.
    pub fn tokenizers(&self) -> Vec<&TokenizerId> {
        let mut names: Vec<_> = self
            .tokenizers
            .iter()
            .filter(|(_, l)| !l.is_empty())
            .map(|(t, _)| t)
            .collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.tokenizers.values().all(TokenizerListeners::is_empty)
    }
}
