//! JSON codec
//!
//! Uses serde_json. The document root must be an object; `null` members are
//! dropped since the value model has no null.

use super::{read_input, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::{Map, Value};
use std::io::{Read, Write};

const NAME: &str = "json";

/// JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &[],
    };

    /// Create new JSON codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn descriptor(&self) -> FormatDescriptor {
        Self::DESCRIPTOR
    }

    fn decode(
        &self,
        _store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError> {
        let bytes = read_input(input, NAME)?;
        let parsed: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| CodecError::decode(NAME, e))?;
        let decoded = match parsed {
            serde_json::Value::Object(object) => map_from_json(object),
            other => {
                return Err(CodecError::decode(
                    NAME,
                    format!("document root must be an object, found {}", json_kind(&other)),
                ))
            }
        };
        target.extend(decoded);
        Ok(())
    }

    fn encode(
        &self,
        _store: &dyn ConfigStore,
        output: &mut dyn Write,
        source: &Map,
    ) -> Result<(), CodecError> {
        let text = serde_json::to_string_pretty(source).map_err(|e| CodecError::encode(NAME, e))?;
        write_output(output, text.as_bytes(), NAME)
    }
}

/// Convert a JSON object into a canonical mapping
pub(crate) fn map_from_json(object: serde_json::Map<String, serde_json::Value>) -> Map {
    object
        .into_iter()
        .filter_map(|(key, value)| from_json(value).map(|value| (key, value)))
        .collect()
}

/// Convert a JSON value, or `None` for null
pub(crate) fn from_json(value: serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
        serde_json::Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        serde_json::Value::String(s) => Some(Value::String(s)),
        serde_json::Value::Array(items) => {
            Some(Value::Sequence(items.into_iter().filter_map(from_json).collect()))
        }
        serde_json::Value::Object(object) => Some(Value::Map(map_from_json(object))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Result<Map, CodecError> {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        JsonCodec.decode(&mut store, &mut text.as_bytes(), &mut target)?;
        Ok(target)
    }

    #[test]
    fn decode_nested_document() {
        let map = decode(r#"{"db": {"host": "localhost", "port": 5432, "ratio": 0.5}, "tags": ["a", "b"], "on": true}"#)
            .unwrap();

        let db = map["db"].as_map().unwrap();
        assert_eq!(db["host"], Value::from("localhost"));
        assert_eq!(db["port"], Value::Integer(5432));
        assert_eq!(db["ratio"], Value::Float(0.5));
        assert_eq!(map["tags"], Value::from(vec!["a", "b"]));
        assert_eq!(map["on"], Value::Boolean(true));
    }

    #[test]
    fn decode_drops_nulls() {
        let map = decode(r#"{"a": null, "b": 1}"#).unwrap();
        assert!(!map.contains_key("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn decode_rejects_non_object_root() {
        let err = decode("[1, 2]").unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn decode_malformed_leaves_target_untouched() {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        target.insert("kept".to_string(), Value::from("yes"));

        let err = JsonCodec
            .decode(&mut store, &mut r#"{"a": "#.as_bytes(), &mut target)
            .unwrap_err();
        assert!(err.is_decode());
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn encode_pretty_two_space_indent() {
        let store = TestStore::empty();
        let mut source = Map::new();
        source.insert("name".to_string(), Value::from("demo"));

        let mut out = Vec::new();
        JsonCodec.encode(&store, &mut out, &source).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"name\": \"demo\"\n}");
    }
}
