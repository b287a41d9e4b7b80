//! INI codec
//!
//! Every entry decodes to `section.key` with a string value. Entries outside
//! any section belong to the `default` section, and keys under `default`
//! encode back without a section header.

use super::{read_input_string, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use ::ini::Ini;
use polyconf_value::{path, Map, Value};
use std::io::{Read, Write};

const NAME: &str = "ini";

/// Section holding entries outside any `[section]`
const DEFAULT_SECTION: &str = "default";

/// INI codec
#[derive(Debug, Clone, Copy, Default)]
pub struct IniCodec;

impl IniCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &[],
    };

    /// Create new INI codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for IniCodec {
    fn descriptor(&self) -> FormatDescriptor {
        Self::DESCRIPTOR
    }

    fn decode(
        &self,
        _store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError> {
        let text = read_input_string(input, NAME)?;
        let ini = Ini::load_from_str(&text).map_err(|e| CodecError::decode(NAME, e))?;

        let mut decoded = Map::new();
        for (section, properties) in ini.iter() {
            let section = section.unwrap_or(DEFAULT_SECTION);
            for (key, value) in properties.iter() {
                path::deep_set(&mut decoded, &format!("{section}.{key}"), Value::from(value));
            }
        }
        target.extend(decoded);
        Ok(())
    }

    fn encode(
        &self,
        store: &dyn ConfigStore,
        output: &mut dyn Write,
        _source: &Map,
    ) -> Result<(), CodecError> {
        let mut ini = Ini::new();
        for key in store.all_keys() {
            let value = store.get_string(&key)?;
            let (section, leaf) = path::split_last(&key);
            let section = section.filter(|s| *s != DEFAULT_SECTION);
            ini.with_section(section).set(leaf, value);
        }

        let mut buf = Vec::new();
        ini.write_to(&mut buf)
            .map_err(|e| CodecError::encode(NAME, e))?;
        write_output(output, &buf, NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Map {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        IniCodec
            .decode(&mut store, &mut text.as_bytes(), &mut target)
            .unwrap();
        target
    }

    fn encode(store: &TestStore) -> String {
        let mut out = Vec::new();
        IniCodec.encode(store, &mut out, &store.data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn decode_sections_as_nested_keys() {
        let map = decode("name=demo\n\n[db]\nhost=localhost\nport=5432\n");

        assert_eq!(map["default"].as_map().unwrap()["name"], Value::from("demo"));
        let db = map["db"].as_map().unwrap();
        assert_eq!(db["host"], Value::from("localhost"));
        assert_eq!(db["port"], Value::from("5432"));
    }

    #[test]
    fn default_section_encodes_without_header() {
        let store = TestStore::empty()
            .with("default.host", "localhost")
            .with("db.user", "root");
        let text = encode(&store);
        let lines: Vec<_> = text.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines, vec!["host=localhost", "[db]", "user=root"]);
        assert!(!text.contains("[default]"));
    }

    #[test]
    fn unsectioned_key_encodes_without_header() {
        let store = TestStore::empty().with("name", "demo");
        assert_eq!(encode(&store).trim(), "name=demo");
    }

    #[test]
    fn nested_prefix_becomes_dotted_section() {
        let store = TestStore::empty().with("server.http.port", 8080_i64);
        let text = encode(&store);
        assert!(text.contains("[server.http]"));
        assert!(text.contains("port=8080"));
    }

    #[test]
    fn encode_then_decode() {
        let store = TestStore::empty()
            .with("default.host", "localhost")
            .with("db.user", "root");
        assert_eq!(decode(&encode(&store)), store.data);
    }

    #[test]
    fn encode_propagates_unreadable_keys() {
        let store = TestStore::empty().with("db.hosts", Value::Sequence(vec![Value::empty_map()]));
        let mut out = Vec::new();
        let err = IniCodec.encode(&store, &mut out, &store.data).unwrap_err();
        assert!(err.is_coercion());
    }
}
