//! In-memory configuration store
//!
//! [`Config`] owns one configuration tree together with the name of the
//! format it is read from and written to. It is the store codecs work
//! against and exposes the property-set side channel.

use polyconf_codec::{
    CodecError, CodecRegistry, ConfigReader, ConfigStore, PropertySet, PropertySetAccess,
    StoreError,
};
use polyconf_value::{path, Map, Value};
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// A named configuration tree
#[derive(Debug, Clone, Default)]
pub struct Config {
    name: String,
    format: String,
    data: Map,
    properties: Option<PropertySet>,
}

impl Config {
    /// Create empty configuration in `format`
    ///
    /// `format` is any name the registry answers to; it is checked when the
    /// configuration is read or written.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            data: Map::new(),
            properties: None,
        }
    }

    /// Decode `reader` as `format` using the process-wide registry
    ///
    /// # Errors
    /// Returns [`CodecError`] if the format is unknown or the input is invalid
    pub fn load<R: Read>(
        name: impl Into<String>,
        format: impl Into<String>,
        reader: R,
    ) -> Result<Self, CodecError> {
        let mut config = Self::new(name, format);
        config.read_from(CodecRegistry::global(), reader)?;
        Ok(config)
    }

    /// Configuration name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format name used for reading and writing
    #[inline]
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Change the format used for subsequent reads and writes
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    /// Whole configuration tree
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Map {
        &self.data
    }

    /// Store `value` under a dotted key
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        path::deep_set(&mut self.data, key, value.into());
    }

    /// Replace the tree with the decoded contents of `reader`
    ///
    /// The recorded property set is replaced too: it survives only if the
    /// codec records a new one. The current tree and property set are kept
    /// if decoding fails.
    ///
    /// # Errors
    /// Returns [`CodecError`] if the format is unknown or the input is invalid
    pub fn read_from<R: Read>(
        &mut self,
        registry: &CodecRegistry,
        mut reader: R,
    ) -> Result<(), CodecError> {
        let codec = registry.lookup(&self.format)?;
        let mut decoded = Map::new();
        let previous = self.properties.take();
        if let Err(err) = codec.decode(self, &mut reader, &mut decoded) {
            self.properties = previous;
            return Err(err);
        }
        self.data = decoded;
        tracing::debug!(
            name = %self.name,
            format = %self.format,
            keys = self.data.len(),
            "configuration decoded"
        );
        Ok(())
    }

    /// Encode the tree to `writer`
    ///
    /// # Errors
    /// Returns [`CodecError`] if the format is unknown, a value cannot be
    /// written in it, or the writer fails
    pub fn write_to<W: Write>(&self, registry: &CodecRegistry, mut writer: W) -> Result<(), CodecError> {
        let codec = registry.lookup(&self.format)?;
        codec.encode(self, &mut writer, &self.data)?;
        tracing::debug!(
            name = %self.name,
            format = %self.format,
            keys = self.data.len(),
            "configuration encoded"
        );
        Ok(())
    }

    /// Deserialize the subtree under `key`; an empty key selects the whole tree
    ///
    /// # Errors
    /// Returns [`StoreError::KeyAbsent`] for a missing key and
    /// [`StoreError::Deserialize`] if the subtree does not fit `T`
    pub fn unmarshal_key<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let json = if key.is_empty() {
            serde_json::to_value(&self.data)
        } else {
            serde_json::to_value(self.get(key)?)
        };
        json.and_then(serde_json::from_value)
            .map_err(|e| StoreError::Deserialize {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}

impl ConfigReader for Config {
    fn all_keys(&self) -> Vec<String> {
        path::flatten_keys(&self.data)
    }

    fn get(&self, key: &str) -> Result<&Value, StoreError> {
        path::deep_get(&self.data, &path::split_key(key)).ok_or_else(|| StoreError::key_absent(key))
    }
}

impl ConfigStore for Config {
    fn property_access(&self) -> Option<&dyn PropertySetAccess> {
        Some(self)
    }

    fn property_access_mut(&mut self) -> Option<&mut dyn PropertySetAccess> {
        Some(self)
    }
}

impl PropertySetAccess for Config {
    fn property_set(&self) -> Option<&PropertySet> {
        self.properties.as_ref()
    }

    fn set_property_set(&mut self, set: PropertySet) {
        self.properties = Some(set);
    }
}
