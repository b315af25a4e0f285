use std::sync::LazyLock;

use regex::Regex;

use crate::models::KvPair;

use super::LineMatcher;

// Key of 1-60 characters, then one of `:` `-` `–` `—`, then the value.
static RE_SEPARATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.{1,60}?)\s*[:\-–—]\s*(.+?)\s*$").expect("valid separator regex")
});

/// Tier 1: `key: value` and `key - value` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeparatorMatcher;

impl LineMatcher for SeparatorMatcher {
    fn name(&self) -> &'static str {
        "separator"
    }

    fn match_line(&self, line: &str) -> Option<KvPair> {
        let caps = RE_SEPARATED.captures(line)?;
        let key = caps.get(1)?.as_str().trim();
        let value = caps.get(2)?.as_str().trim();
        Some(KvPair::new(key, value))
    }
}
