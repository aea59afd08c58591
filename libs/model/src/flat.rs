use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The flat key/value representation the external system stores.
///
/// Every key the external schema expects is present on every save, blank
/// fields as empty strings. Keys are plain strings since the external side
/// also carries fan-out keys (`field___code`) and bookkeeping fields
/// (`record_id`, `validity`, `stat*`) that are not form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(BTreeMap<String, String>);

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Emit an empty string for `key` (the external "blank", not absence).
    pub fn set_blank(&mut self, key: impl Into<String>) {
        self.set(key, "");
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key` if present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_present_but_empty() {
        let mut r = FlatRecord::new();
        r.set_blank("adatum");
        assert_eq!(r.get("adatum"), Some(""));
        assert_eq!(r.get_non_empty("adatum"), None);
        assert!(r.contains_key("adatum"));
    }
}
