use serde::Serialize;

/// A single extracted `(key, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive identity used for deduplication.
    pub fn identity(&self) -> (String, String) {
        (self.key.to_lowercase(), self.value.to_lowercase())
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KvPair {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
