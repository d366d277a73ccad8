//! Ordered key/value document backing one engine's persistent state.

use std::collections::HashMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use chanstate_types::{StateError, Value};

/// Mapping from string key to [`Value`].
///
/// Keys are unique. Insertion order is kept so serialization is stable, but
/// equality only compares key/value content.
#[derive(Debug, Clone, Default)]
pub struct StateDocument {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl StateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert `key`, or replace the whole value already stored at it.
    /// Every other key is left untouched.
    pub fn merge(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let value = value.normalized();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Merge every key of `other` into `self` with the same overwrite rule as [`merge`].
    ///
    /// [`merge`]: StateDocument::merge
    pub fn merge_document(&mut self, other: StateDocument) {
        for (key, value) in other.entries {
            self.merge(key, value);
        }
    }

    /// Parse `text` and merge it in. On a parse failure `self` is unchanged.
    pub fn merge_from(&mut self, text: &str) -> Result<(), StateError> {
        let other = Self::parse(text)?;
        self.merge_document(other);
        Ok(())
    }

    /// Parse serialized text. Absent (empty or whitespace-only) input is an empty document.
    pub fn parse(text: &str) -> Result<Self, StateError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Compact JSON encoding, keys in insertion order.
    pub fn serialize(&self) -> String {
        match serde_json::to_string(self) {
            Ok(text) => text,
            Err(e) => {
                log::error!(target: "state", "failed to serialize state document: {}", e);
                String::from("{}")
            }
        }
    }

    /// Indented JSON encoding with a trailing newline, as written to snapshot files.
    pub fn serialize_pretty(&self, indent: usize) -> String {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        if let Err(e) = Serialize::serialize(self, &mut ser) {
            log::error!(target: "state", "failed to serialize state document: {}", e);
            return String::from("{}\n");
        }
        let mut text = String::from_utf8_lossy(&out).into_owned();
        text.push('\n');
        text
    }
}

impl PartialEq for StateDocument {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(String, Value)> for StateDocument {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.merge(key, value);
        }
        doc
    }
}

impl Serialize for StateDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StateDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = StateDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of numbers, strings, number arrays or string arrays")
            }

            fn visit_map<A>(self, mut access: A) -> Result<StateDocument, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut doc = StateDocument::new();
                // Duplicate keys: last value wins, first position kept
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    doc.merge(key, value);
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
