//! Loaded translation bundles.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::BookhubError;

/// A key → display string mapping for one language.
///
/// Bundles are immutable once loaded; a language change replaces the
/// whole bundle. Empty strings are treated as missing translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct LanguageBundle {
    entries: HashMap<String, String>,
}

impl LanguageBundle {
    /// Parse a flat JSON object.
    pub fn from_json(text: &str) -> Result<Self, BookhubError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Translation for `key`, if present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Translation for `key`, or `default` when missing.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Translation for `key`, or the key itself when missing.
    pub fn text_or_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.text_or(key, key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for LanguageBundle {
    fn from(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                Value::Number(n) => Some((k, n.to_string())),
                Value::Bool(b) => Some((k, b.to_string())),
                _ => None,
            })
            .collect();
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LanguageBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
