//! YAML codec
//!
//! An empty document decodes to an empty mapping. Boolean and numeric
//! mapping keys are stringified; complex keys are skipped.

use super::{read_input, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::{Map, Value};
use serde_yaml::Value as YamlValue;
use std::io::{Read, Write};

const NAME: &str = "yaml";

/// YAML codec
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl YamlCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &["yml"],
    };

    /// Create new YAML codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for YamlCodec {
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
        let parsed: YamlValue =
            serde_yaml::from_slice(&bytes).map_err(|e| CodecError::decode(NAME, e))?;
        let decoded = match parsed {
            YamlValue::Null => Map::new(),
            YamlValue::Mapping(mapping) => map_from_yaml(mapping),
            _ => return Err(CodecError::decode(NAME, "document root must be a mapping")),
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
        let text = serde_yaml::to_string(source).map_err(|e| CodecError::encode(NAME, e))?;
        write_output(output, text.as_bytes(), NAME)
    }
}

fn map_from_yaml(mapping: serde_yaml::Mapping) -> Map {
    let mut map = Map::new();
    for (key, value) in mapping {
        let key = match key {
            YamlValue::String(s) => s,
            YamlValue::Bool(b) => b.to_string(),
            YamlValue::Number(n) => n.to_string(),
            other => {
                tracing::warn!(key = ?other, "skipping non-scalar yaml mapping key");
                continue;
            }
        };
        if let Some(value) = from_yaml(value) {
            map.insert(key, value);
        }
    }
    map
}

fn from_yaml(value: YamlValue) -> Option<Value> {
    match value {
        YamlValue::Null => None,
        YamlValue::Bool(b) => Some(Value::Boolean(b)),
        YamlValue::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        YamlValue::String(s) => Some(Value::String(s)),
        YamlValue::Sequence(items) => {
            Some(Value::Sequence(items.into_iter().filter_map(from_yaml).collect()))
        }
        YamlValue::Mapping(mapping) => Some(Value::Map(map_from_yaml(mapping))),
        YamlValue::Tagged(tagged) => from_yaml(tagged.value),
    }
}
