/// Characters that end a line: ASCII breaks plus the Unicode line and
/// paragraph separators. `\r\n` splits twice; the empty piece is dropped.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Text produced by an OCR engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText {
    text: String,
}

impl RawText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the text holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The text with surrounding whitespace removed, as returned to callers.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Non-empty lines, each trimmed, in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split(LINE_BREAKS)
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_drops_blank_lines_and_trims() {
        let text = RawText::new("  Name: A  \n\n   \t\nAge - 3\r\n");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Name: A", "Age - 3"]);
    }

    #[test]
    fn test_lines_split_on_lone_carriage_return_and_unicode_breaks() {
        let text = RawText::new("Name: John Smith\rAge - 30\u{2028}City: Oslo\u{2029}Zip: 0150");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Name: John Smith", "Age - 30", "City: Oslo", "Zip: 0150"]);

        let text = RawText::new("a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g");
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_blank_detection() {
        assert!(RawText::empty().is_blank());
        assert!(RawText::new(" \n\t \n").is_blank());
        assert!(!RawText::new("\nx\n").is_blank());
    }
}
