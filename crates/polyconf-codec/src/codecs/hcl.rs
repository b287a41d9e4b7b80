//! HCL codec
//!
//! Bodies deserialize through hcl-rs into a JSON-shaped tree; blocks become
//! nested mappings keyed by their identifier and labels.

use super::json::map_from_json;
use super::{read_input_string, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::Map;
use std::io::{Read, Write};

const NAME: &str = "hcl";

/// HCL codec
#[derive(Debug, Clone, Copy, Default)]
pub struct HclCodec;

impl HclCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &[],
    };

    /// Create new HCL codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for HclCodec {
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
        let parsed: serde_json::Value =
            ::hcl::from_str(&text).map_err(|e| CodecError::decode(NAME, e))?;
        match parsed {
            serde_json::Value::Object(object) => {
                target.extend(map_from_json(object));
                Ok(())
            }
            _ => Err(CodecError::decode(NAME, "body did not decode to a mapping")),
        }
    }

    fn encode(
        &self,
        _store: &dyn ConfigStore,
        output: &mut dyn Write,
        source: &Map,
    ) -> Result<(), CodecError> {
        let text = ::hcl::to_string(source).map_err(|e| CodecError::encode(NAME, e))?;
        write_output(output, text.as_bytes(), NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use polyconf_value::Value;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Result<Map, CodecError> {
        let mut store = TestStore::empty();
        let mut target = Map::new();
        HclCodec.decode(&mut store, &mut text.as_bytes(), &mut target)?;
        Ok(target)
    }

    #[test]
    fn decode_attributes_and_blocks() {
        let map = decode("name = \"demo\"\nport = 8080\n\ndb {\n  host = \"localhost\"\n}\n").unwrap();

        assert_eq!(map["name"], Value::from("demo"));
        assert_eq!(map["port"], Value::Integer(8080));
        assert_eq!(map["db"].as_map().unwrap()["host"], Value::from("localhost"));
    }

    #[test]
    fn decode_malformed() {
        assert!(decode("name = ").unwrap_err().is_decode());
    }

    #[test]
    fn encode_then_decode() {
        let mut source = Map::new();
        polyconf_value::path::deep_set(&mut source, "db.host", Value::from("localhost"));
        polyconf_value::path::deep_set(&mut source, "db.port", Value::from(5432_i64));
        source.insert("tags".to_string(), Value::from(vec!["a", "b"]));

        let mut out = Vec::new();
        HclCodec.encode(&TestStore::empty(), &mut out, &source).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(decode(&text).unwrap(), source);
    }
}
