//! Testing utilities for the polyconf workspace
//!
//! Shared stores, fixtures, and assertions.

#![allow(missing_docs)]

use polyconf_codec::{ConfigReader, ConfigStore, Format, StoreError};
use polyconf_value::{path, Map, Value};

/// Store with no optional capabilities
#[derive(Debug, Clone, Default)]
pub struct BareStore {
    pub data: Map,
}

impl BareStore {
    pub fn new(data: Map) -> Self {
        Self { data }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        path::deep_set(&mut self.data, key, value.into());
        self
    }
}

impl ConfigReader for BareStore {
    fn all_keys(&self) -> Vec<String> {
        path::flatten_keys(&self.data)
    }

    fn get(&self, key: &str) -> Result<&Value, StoreError> {
        path::deep_get(&self.data, &path::split_key(key)).ok_or_else(|| StoreError::key_absent(key))
    }
}

impl ConfigStore for BareStore {}

/// Small document in `format` that decodes, encodes and decodes again
/// to the same configuration
pub fn sample_document(format: Format) -> &'static str {
    match format {
        Format::Json => {
            r#"{"app": {"name": "demo", "port": 8080, "debug": true, "tags": ["a", "b"]}, "db": {"host": "localhost", "ratio": 0.75}}"#
        }
        Format::Toml => {
            "[app]\nname = \"demo\"\nport = 8080\ndebug = true\ntags = [\"a\", \"b\"]\n\n[db]\nhost = \"localhost\"\nstarted = 2024-01-02T03:04:05Z\n"
        }
        Format::Yaml => "app:\n  name: demo\n  port: 8080\n  debug: true\n  tags:\n    - a\n    - b\ndb:\n  host: localhost\n",
        Format::Properties => "# application\napp.name=demo\napp.port=8080\n\n# database\ndb.host=localhost\n",
        Format::Hcl => "name = \"demo\"\nport = 8080\ntags = [\"a\", \"b\"]\n\ndb {\n  host = \"localhost\"\n}\n",
        Format::Dotenv => "app_name=demo\nAPP_PORT=8080\nGreeting='hello world'\n",
        Format::Ini => "name=demo\n\n[db]\nhost=localhost\nport=5432\n",
        Format::Xml => {
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n  <app>\n    <name>demo</name>\n    <port>8080</port>\n  </app>\n  <server id=\"web1\" weight=\"3\"/>\n  <host>a</host>\n  <host>b</host>\n</root>\n"
        }
    }
}

/// Assert two stores hold the same configuration
///
/// Key sets must match exactly. Values match when equal, or when both read
/// back as the same string.
///
/// # Panics
/// Panics with the first differing key
pub fn assert_semantically_equal(left: &dyn ConfigReader, right: &dyn ConfigReader) {
    let mut left_keys = left.all_keys();
    let mut right_keys = right.all_keys();
    left_keys.sort();
    right_keys.sort();
    assert_eq!(left_keys, right_keys, "key sets differ");

    for key in &left_keys {
        let (Ok(l), Ok(r)) = (left.get(key), right.get(key)) else {
            panic!("key '{key}' listed but not readable");
        };
        if l == r {
            continue;
        }
        match (left.get_string(key), right.get_string(key)) {
            (Ok(l), Ok(r)) if l == r => {}
            _ => panic!("value of '{key}' differs: {l:?} != {r:?}"),
        }
    }
}

/// Build a mapping from `(dotted key, value)` pairs
pub fn map_of<V: Into<Value>>(entries: impl IntoIterator<Item = (&'static str, V)>) -> Map {
    let mut map = Map::new();
    for (key, value) in entries {
        path::deep_set(&mut map, key, value.into());
    }
    map
}
