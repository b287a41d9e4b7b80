//! TOML codec
//!
//! Offset date-times map to timestamps; local dates and times carry no
//! offset and stay strings.

use super::{read_input_string, write_output, Codec, FormatDescriptor};
use crate::error::CodecError;
use crate::store::ConfigStore;
use chrono::DateTime;
use polyconf_value::{Map, Value};
use std::io::{Read, Write};

const NAME: &str = "toml";

/// TOML codec
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl TomlCodec {
    /// Names this codec answers to
    pub const DESCRIPTOR: FormatDescriptor = FormatDescriptor {
        name: NAME,
        aliases: &[],
    };

    /// Create new TOML codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Codec for TomlCodec {
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
        let table = text
            .parse::<::toml::Table>()
            .map_err(|e| CodecError::decode(NAME, e))?;
        target.extend(table.into_iter().map(|(key, value)| (key, from_toml(value))));
        Ok(())
    }

    fn encode(
        &self,
        _store: &dyn ConfigStore,
        output: &mut dyn Write,
        source: &Map,
    ) -> Result<(), CodecError> {
        let table = table_from_map(source);
        let text = ::toml::to_string(&table).map_err(|e| CodecError::encode(NAME, e))?;
        write_output(output, text.as_bytes(), NAME)
    }
}

fn from_toml(value: ::toml::Value) -> Value {
    match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Integer(i),
        ::toml::Value::Float(x) => Value::Float(x),
        ::toml::Value::Boolean(b) => Value::Boolean(b),
        ::toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            if dt.offset.is_some() {
                if let Ok(timestamp) = DateTime::parse_from_rfc3339(&text) {
                    return Value::Timestamp(timestamp);
                }
            }
            Value::String(text)
        }
        ::toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        ::toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect(),
        ),
    }
}

fn table_from_map(map: &Map) -> ::toml::Table {
    map.iter()
        .map(|(key, value)| (key.clone(), to_toml(value)))
        .collect()
}

fn to_toml(value: &Value) -> ::toml::Value {
    match value {
        Value::String(s) => ::toml::Value::String(s.clone()),
        Value::Integer(i) => ::toml::Value::Integer(*i),
        Value::Float(x) => ::toml::Value::Float(*x),
        Value::Boolean(b) => ::toml::Value::Boolean(*b),
        Value::Timestamp(t) => {
            let text = t.to_rfc3339();
            match text.parse::<::toml::value::Datetime>() {
                Ok(dt) => ::toml::Value::Datetime(dt),
                Err(_) => ::toml::Value::String(text),
            }
        }
        Value::Duration(_) => ::toml::Value::String(value.to_string()),
        Value::Map(map) => ::toml::Value::Table(table_from_map(map)),
        Value::Sequence(items) => ::toml::Value::Array(items.iter().map(to_toml).collect()),
    }
}
