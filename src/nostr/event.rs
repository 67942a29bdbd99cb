use serde::{Deserialize, Serialize};

/// NIP-01 event (minimal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: i64,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// Returns the value of the first tag named `name`, if that tag carries one.
    pub fn first_tag_value(&self, name: &str) -> Option<&str> {
        first_tag_value(name, &self.tags)
    }

    /// Pretty-printed JSON dump used by the raw view.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Scans `tags` in order and returns the second element of the first tag whose
/// first element is `name`.
pub fn first_tag_value<'a>(name: &str, tags: &'a [Vec<String>]) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.first().map(|s| s.as_str()) == Some(name))
        .and_then(|t| t.get(1))
        .map(|s| s.as_str())
}
