//! Heuristic key-value extraction from OCR text.
//!
//! Each non-empty line is offered to a list of [`LineMatcher`]s in precedence
//! order and the first match wins. Lines no matcher accepts are dropped. The
//! resulting pairs are deduplicated case-insensitively, keeping the first
//! occurrence.

mod heuristic;
mod separator;

use std::collections::HashSet;

use crate::models::{KvPair, RawText};

pub use heuristic::{SpacedMatcher, MAX_KEY_TOKENS, MAX_VALUE_CHARS};
pub use separator::SeparatorMatcher;

/// A single extraction rule applied to one trimmed line.
pub trait LineMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn match_line(&self, line: &str) -> Option<KvPair>;
}

/// Runs matchers over every line with explicit precedence.
pub struct KeyValueExtractor {
    tiers: Vec<Box<dyn LineMatcher>>,
}

impl Default for KeyValueExtractor {
    fn default() -> Self {
        Self::new(vec![Box::new(SeparatorMatcher), Box::new(SpacedMatcher)])
    }
}

impl KeyValueExtractor {
    /// `tiers` are tried in order; earlier tiers take precedence.
    pub fn new(tiers: Vec<Box<dyn LineMatcher>>) -> Self {
        Self { tiers }
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub fn match_line(&self, line: &str) -> Option<KvPair> {
        self.tiers.iter().find_map(|tier| tier.match_line(line))
    }

    pub fn extract(&self, text: &RawText) -> Vec<KvPair> {
        let candidates = text.lines().filter_map(|line| self.match_line(line));
        let pairs = dedup_pairs(candidates);
        tracing::debug!(pairs = pairs.len(), "Extracted key-value pairs");
        pairs
    }
}

/// Extract pairs from plain text with the default tiers.
pub fn extract_key_values(text: &str) -> Vec<KvPair> {
    KeyValueExtractor::default().extract(&RawText::new(text))
}

/// Keep the first occurrence of each case-insensitive `(key, value)`.
pub fn dedup_pairs(pairs: impl IntoIterator<Item = KvPair>) -> Vec<KvPair> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| seen.insert(pair.identity()))
        .collect()
}
