use std::sync::LazyLock;

use regex::Regex;

use crate::models::KvPair;

use super::LineMatcher;

pub const MAX_KEY_TOKENS: usize = 4;
pub const MAX_VALUE_CHARS: usize = 200;

static RE_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<k>[A-Za-z ]{2,40})\s+(?:[:–\-—]?\s*)?(?P<v>.+)$")
        .expect("valid spaced pair regex")
});

/// Tier 2: `Invoice Number 44521` style lines with no explicit separator.
///
/// The pattern alone matches most prose, so candidates are only kept when the
/// line has no colon, the key has at most [`MAX_KEY_TOKENS`] words and the
/// value is non-empty and shorter than [`MAX_VALUE_CHARS`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedMatcher;

impl SpacedMatcher {
    fn accept(line: &str, key: &str, value: &str) -> Option<KvPair> {
        if line.contains(':') || value.chars().count() >= MAX_VALUE_CHARS {
            return None;
        }

        let key = key.trim();
        let value = value.trim();
        if key.split_whitespace().count() > MAX_KEY_TOKENS || value.is_empty() {
            return None;
        }

        Some(KvPair::new(key, value))
    }
}

impl LineMatcher for SpacedMatcher {
    fn name(&self) -> &'static str {
        "spaced"
    }

    fn match_line(&self, line: &str) -> Option<KvPair> {
        let caps = RE_SPACED.captures(line)?;
        Self::accept(line, caps.name("k")?.as_str(), caps.name("v")?.as_str())
    }
}
