//! Parsed properties documents
//!
//! [`PropertySet`] keeps a properties file as an ordered list of entries with
//! the comments that precede each one, so a decode followed by an encode
//! reproduces the original layout with updated values.

use indexmap::IndexMap;
use java_properties::{LineContent, PropertiesIter, PropertiesWriter};
use std::io::{Read, Write};

/// A single property with its leading comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// Raw string value
    pub value: String,
    /// Comment lines directly above the entry, without the `#` marker or
    /// surrounding whitespace
    pub comments: Vec<String>,
}

/// Ordered properties document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: IndexMap<String, Property>,
    trailing_comments: Vec<String>,
}

impl PropertySet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a UTF-8 properties document
    ///
    /// Comments attach to the next entry; comments after the last entry are
    /// kept as trailing comments. A key appearing twice keeps its first
    /// position and its last value.
    ///
    /// # Errors
    /// Returns the underlying parser error for malformed input or failed reads
    pub fn load<R: Read>(reader: R) -> Result<Self, java_properties::PropertiesError> {
        let mut set = Self::new();
        let mut pending = Vec::new();
        for line in PropertiesIter::new_with_encoding(reader, encoding_rs::UTF_8) {
            match line?.consume_content() {
                LineContent::Comment(text) => pending.push(text.trim().to_string()),
                LineContent::KVPair(key, value) => {
                    let entry = set.entries.entry(key).or_default();
                    entry.value = value;
                    entry.comments.append(&mut pending);
                }
            }
        }
        set.trailing_comments = pending;
        Ok(set)
    }

    /// Write the document as UTF-8
    ///
    /// # Errors
    /// Returns the underlying writer error if the output stream fails
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), java_properties::PropertiesError> {
        let mut out = PropertiesWriter::new_with_encoding(writer, encoding_rs::UTF_8);
        for (key, property) in &self.entries {
            for comment in &property.comments {
                out.write_comment(comment)?;
            }
            out.write(key, &property.value)?;
        }
        for comment in &self.trailing_comments {
            out.write_comment(comment)?;
        }
        out.finish()
    }

    /// Set a value, keeping position and comments of an existing entry
    ///
    /// An existing key is matched ignoring ASCII case and keeps its original
    /// spelling. New keys are appended.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(property) = self.find_mut(key) {
            property.value = value;
            return;
        }
        self.entries.insert(
            key.to_string(),
            Property {
                value,
                comments: Vec::new(),
            },
        );
    }

    /// Drop every entry whose key fails `keep`, along with its comments
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|key, _| keep(key));
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Property> {
        if self.entries.contains_key(key) {
            return self.entries.get_mut(key);
        }
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, property)| property)
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|p| p.value.as_str())
    }

    /// Comments above `key`
    #[must_use]
    pub fn comments(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(|p| p.comments.as_slice())
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, value)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, p)| (key.as_str(), p.value.as_str()))
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if set has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = "# database\ndb.host=localhost\ndb.port = 5432\n\n# cache\ncache.ttl:30s\n# end\n";

    #[test]
    fn load_keeps_order_and_comments() {
        let set = PropertySet::load(DOCUMENT.as_bytes()).unwrap();

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["db.host", "db.port", "cache.ttl"]);
        assert_eq!(set.get("db.port"), Some("5432"));
        assert_eq!(set.get("cache.ttl"), Some("30s"));
        assert_eq!(set.comments("db.host").unwrap().len(), 1);
        assert!(set.comments("db.host").unwrap()[0].contains("database"));
        assert!(set.comments("db.port").unwrap().is_empty());
    }

    #[test]
    fn set_matches_existing_key_ignoring_case() {
        let mut set = PropertySet::load(DOCUMENT.as_bytes()).unwrap();
        set.set("DB.HOST", "db.internal");
        set.set("log.level", "info");

        assert_eq!(set.len(), 4);
        assert_eq!(set.get("db.host"), Some("db.internal"));
        assert_eq!(set.keys().last(), Some("log.level"));
    }

    #[test]
    fn write_preserves_comments() {
        let mut set = PropertySet::load(DOCUMENT.as_bytes()).unwrap();
        set.set("db.port", "6543");

        let mut out = Vec::new();
        set.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("database"));
        assert!(text.contains("end"));
        assert!(text.find("database").unwrap() < text.find("db.host").unwrap());

        let reloaded = PropertySet::load(text.as_bytes()).unwrap();
        assert_eq!(reloaded.get("db.port"), Some("6543"));
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn empty_set() {
        let set = PropertySet::new();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn comments_are_stable_across_rewrites() {
        let mut text = "#   indented note\n!bang\na=1\n".to_string();
        for _ in 0..3 {
            let set = PropertySet::load(text.as_bytes()).unwrap();
            assert_eq!(set.comments("a").unwrap(), ["indented note", "bang"]);

            let mut out = Vec::new();
            set.write_to(&mut out).unwrap();
            text = String::from_utf8(out).unwrap();
        }
        assert_eq!(text, "# indented note\n# bang\na=1\n");
    }

    #[test]
    fn retain_drops_entries_with_comments() {
        let mut set = PropertySet::load(DOCUMENT.as_bytes()).unwrap();
        set.retain(|key| key.starts_with("db."));

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["db.host", "db.port"]);
        assert!(set.comments("cache.ttl").is_none());
    }
}
