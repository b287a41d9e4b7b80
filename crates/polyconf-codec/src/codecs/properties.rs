//! Java-style properties codec
//!
//! Requires a store exposing the property-set capability: decode records the
//! parsed document on the store and encode starts from it, so comments and
//! key order survive. Recorded entries the store no longer holds are left
//! out. Stores without the capability are refused in both
//! directions.

use super::{write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::properties::PropertySet;
use crate::store::ConfigStore;
use polyconf_value::{path, Map, Value};
use std::io::{Read, Write};

const NAME: &str = "properties";
const CAPABILITY: &str = "property set";

/// Properties codec
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesCodec;

impl PropertiesCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &["props", "prop"],
    };

    /// Create new properties codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for PropertiesCodec {
    fn descriptor(&self) -> FormatDescriptor {
        Self::DESCRIPTOR
    }

    fn decode(
        &self,
        store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError> {
        let access = store
            .property_access_mut()
            .ok_or_else(|| CodecError::unsupported_target(NAME, CAPABILITY))?;
        let set = PropertySet::load(input).map_err(|e| CodecError::decode(NAME, e.to_string()))?;

        let mut decoded = Map::new();
        for (key, value) in set.iter() {
            let segments = path::split_key(key);
            let Some((leaf, prefix)) = segments.split_last() else {
                continue;
            };
            deep_search_leaf(&mut decoded, prefix, leaf, value);
        }
        access.set_property_set(set);
        target.extend(decoded);
        Ok(())
    }

    fn encode(
        &self,
        store: &dyn ConfigStore,
        output: &mut dyn Write,
        _source: &Map,
    ) -> Result<(), CodecError> {
        let access = store
            .property_access()
            .ok_or_else(|| CodecError::unsupported_target(NAME, CAPABILITY))?;
        let keys = store.all_keys();
        let mut set = access.property_set().cloned().unwrap_or_default();
        set.retain(|recorded| keys.iter().any(|key| key.eq_ignore_ascii_case(recorded)));
        for key in keys {
            set.set(&key, store.get_string(&key)?);
        }

        let mut buf = Vec::new();
        set.write_to(&mut buf)
            .map_err(|e| CodecError::encode(NAME, e.to_string()))?;
        write_output(output, &buf, NAME)
    }
}

/// Store `value` under the lower-cased leaf of its key path
fn deep_search_leaf(root: &mut Map, prefix: &[&str], leaf: &str, value: &str) {
    path::deep_search(root, prefix).insert(leaf.to_lowercase(), Value::from(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = "# connection\ndb.host=localhost\ndb.Port=5432\nname=demo\n";

    #[test]
    fn decode_builds_tree_and_records_set() {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        PropertiesCodec
            .decode(&mut store, &mut DOCUMENT.as_bytes(), &mut target)
            .unwrap();

        let db = target["db"].as_map().unwrap();
        assert_eq!(db["host"], Value::from("localhost"));
        assert_eq!(db["port"], Value::from("5432"));
        assert_eq!(target["name"], Value::from("demo"));

        let set = store.properties.as_ref().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("db.Port"), Some("5432"));
    }

    #[test]
    fn decode_requires_capability() {
        let mut store = TestStore::empty().without_properties();
        let mut target = Map::new();
        let err = PropertiesCodec
            .decode(&mut store, &mut DOCUMENT.as_bytes(), &mut target)
            .unwrap_err();

        assert!(err.is_unsupported());
        assert!(target.is_empty());
    }

    #[test]
    fn encode_requires_capability() {
        let store = TestStore::empty().with("a", "1").without_properties();
        let mut out = Vec::new();
        let err = PropertiesCodec.encode(&store, &mut out, &store.data).unwrap_err();

        assert!(err.is_unsupported());
        assert!(out.is_empty());
    }

    #[test]
    fn encode_updates_recorded_set_in_place() {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        PropertiesCodec
            .decode(&mut store, &mut DOCUMENT.as_bytes(), &mut target)
            .unwrap();
        store.data = target;
        path::deep_set(&mut store.data, "db.port", Value::from(6543_i64));
        path::deep_set(&mut store.data, "cache.ttl", Value::from("30s"));

        let mut out = Vec::new();
        PropertiesCodec.encode(&store, &mut out, &store.data).unwrap();
        let text = String::from_utf8(out).unwrap();

        let written = PropertySet::load(text.as_bytes()).unwrap();
        assert_eq!(written.keys().collect::<Vec<_>>(), vec!["db.host", "db.Port", "name", "cache.ttl"]);
        assert_eq!(written.get("db.Port"), Some("6543"));
        assert!(text.starts_with('#'));
        assert!(text.contains("connection"));
    }

    #[test]
    fn encode_without_recorded_set_starts_fresh() {
        let store = TestStore::empty().with("db.host", "localhost");
        let mut out = Vec::new();
        PropertiesCodec.encode(&store, &mut out, &store.data).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "db.host=localhost");
    }

    #[test]
    fn encode_skips_recorded_keys_missing_from_store() {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        PropertiesCodec
            .decode(&mut store, &mut "# gone\nold.secret=hunter2\nName=demo\n".as_bytes(), &mut target)
            .unwrap();
        store.data = Map::new();
        path::deep_set(&mut store.data, "name", Value::from("demo"));
        path::deep_set(&mut store.data, "fresh", Value::from("yes"));

        let mut out = Vec::new();
        PropertiesCodec.encode(&store, &mut out, &store.data).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Name=demo\nfresh=yes\n");
    }

    #[test]
    fn conflicting_keys_resolve_by_document_order() {
        let decode = |text: &str| {
            let mut target = Map::new();
            PropertiesCodec
                .decode(&mut TestStore::empty(), &mut text.as_bytes(), &mut target)
                .unwrap();
            path::flatten_keys(&target)
        };

        assert_eq!(decode("a.b=1\na=2\n"), vec!["a"]);
        assert_eq!(decode("a=2\na.b=1\n"), vec!["a.b"]);
    }
}
