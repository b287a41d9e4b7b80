//! Dotenv codec
//!
//! `KEY=value` lines. Decoded keys are lower-cased and used as dotted paths;
//! on encode each key has `.` replaced by `_` and is upper-cased, so
//! `db.max_conns` is written as `DB_MAX_CONNS`.
//!
//! Undotted keys round-trip (`PORT` decodes as `port` and encodes as `PORT`).
//! Dotted keys do not: `db.host` comes back as `db_host`.

use super::{write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::{path, Map, Value};
use std::io::{Read, Write};

const NAME: &str = "dotenv";

/// Dotenv codec
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvCodec;

impl DotenvCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &["env"],
    };

    /// Create new dotenv codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for DotenvCodec {
    fn descriptor(&self) -> FormatDescriptor {
        Self::DESCRIPTOR
    }

    fn decode(
        &self,
        _store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError> {
        let mut decoded = Map::new();
        for item in dotenvy::from_read_iter(input) {
            let (key, value) = item.map_err(|e| CodecError::decode(NAME, e))?;
            path::deep_set(&mut decoded, &key.to_lowercase(), Value::String(value));
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
        let mut lines = Vec::new();
        for key in store.all_keys() {
            let value = store.get(&key)?;
            lines.push(format!("{}={}", env_name(&key), quote(&value.to_string())));
        }
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        write_output(output, text.as_bytes(), NAME)
    }
}

fn env_name(key: &str) -> String {
    key.replace(path::SEPARATOR, "_").to_uppercase()
}

fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '=' | '"' | '\'' | '\\' | '$' | '`'));
    if !needs_quotes {
        return value.to_string();
    }
    // a backslash before the closing quote would escape it
    if !value.contains('\'') && !value.contains('\n') && !value.ends_with('\\') {
        return format!("'{value}'");
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Result<Map, CodecError> {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        DotenvCodec.decode(&mut store, &mut text.as_bytes(), &mut target)?;
        Ok(target)
    }

    fn encode(store: &TestStore) -> String {
        let mut out = Vec::new();
        DotenvCodec.encode(store, &mut out, &store.data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn encode_flattens_and_uppercases_keys() {
        let store = TestStore::empty().with("db.max_conns", 5_i64);
        assert_eq!(encode(&store), "DB_MAX_CONNS=5\n");
    }

    #[test]
    fn encode_quotes_values_with_whitespace() {
        let store = TestStore::empty()
            .with("greeting", "hello world")
            .with("motto", "it's fine");
        assert_eq!(
            encode(&store),
            "GREETING='hello world'\nMOTTO=\"it's fine\"\n"
        );
    }

    #[test]
    fn encode_double_quotes_trailing_backslash() {
        let store = TestStore::empty().with("dir", "C:\\temp\\");
        let text = encode(&store);
        assert_eq!(text, "DIR=\"C:\\\\temp\\\\\"\n");
        assert_eq!(decode(&text).unwrap()["dir"], Value::from("C:\\temp\\"));
    }

    #[test]
    fn encode_sequence_joins_with_comma() {
        let store = TestStore::empty().with("hosts", vec!["a", "b"]);
        assert_eq!(encode(&store), "HOSTS=a,b\n");
    }

    #[test]
    fn encode_quotes_empty_and_separator_values() {
        let store = TestStore::empty().with("blank", "").with("dsn", "a=b");
        assert_eq!(encode(&store), "BLANK=''\nDSN='a=b'\n");
    }

    #[test]
    fn encode_empty_store() {
        assert_eq!(encode(&TestStore::empty()), "");
    }

    #[test]
    fn decode_lowercases_keys() {
        let map = decode("# comment\nPORT=8080\ndb.Host=localhost\nNAME=\"quoted value\"\n").unwrap();

        assert_eq!(map["port"], Value::from("8080"));
        assert_eq!(map["db"].as_map().unwrap()["host"], Value::from("localhost"));
        assert_eq!(map["name"], Value::from("quoted value"));
        assert!(!map.contains_key("PORT"));
    }

    #[test]
    fn undotted_keys_are_stable_across_round_trip() {
        let first = decode("port=8080\nLog_Level=debug\n").unwrap();
        let encoded = encode(&TestStore::new(first.clone()));
        assert_eq!(encoded, "PORT=8080\nLOG_LEVEL=debug\n");
        assert_eq!(decode(&encoded).unwrap(), first);
    }

    #[test]
    fn dotted_keys_flatten_on_round_trip() {
        let first = decode("db.host=localhost\n").unwrap();
        let second = decode(&encode(&TestStore::new(first))).unwrap();
        assert_eq!(second["db_host"], Value::from("localhost"));
        assert!(!second.contains_key("db"));
    }

    #[test]
    fn quoted_values_survive_round_trip() {
        let store = TestStore::empty()
            .with("a", "two words")
            .with("b", "it's \"quoted\"");
        let map = decode(&encode(&store)).unwrap();
        assert_eq!(map["a"], Value::from("two words"));
        assert_eq!(map["b"], Value::from("it's \"quoted\""));
    }

    #[test]
    fn decode_malformed() {
        assert!(decode("=value\n").unwrap_err().is_decode());
    }
}
