//! Built-in configuration codecs
//!
//! One codec per supported grammar:
//! - JSON, TOML, YAML, HCL via their serde-based parsers
//! - INI, dotenv and properties as flat dotted-key formats
//! - XML with attribute keys normalized to the `attr_` convention
//!
//! Every codec decodes into a scratch mapping first and merges it into the
//! caller's target only on success, so a failed decode never leaves the
//! target half-written.

use crate::error::CodecError;
use crate::store::ConfigStore;
use polyconf_value::Map;
use std::fmt;
use std::io::{Read, Write};

mod dotenv;
mod hcl;
mod ini;
mod json;
mod properties;
mod toml;
mod xml;
mod yaml;

pub use dotenv::DotenvCodec;
pub use hcl::HclCodec;
pub use ini::IniCodec;
pub use json::JsonCodec;
pub use properties::PropertiesCodec;
pub use toml::TomlCodec;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

/// Canonical name and aliases a codec answers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Canonical format name
    pub name: &'static str,
    /// Additional names, matched exactly
    pub aliases: &'static [&'static str],
}

impl FormatDescriptor {
    /// Canonical name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    /// Check if `name` selects this format
    #[inline]
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Decoder and encoder for one configuration grammar
///
/// Implement this trait to add support for new formats, then register the
/// codec with a [`RegistryBuilder`](crate::RegistryBuilder).
pub trait Codec: Send + Sync + fmt::Debug {
    /// Names this codec is registered under by default
    fn descriptor(&self) -> FormatDescriptor;

    /// Parse `input` and merge the resulting tree into `target`
    ///
    /// `store` is the store being loaded; codecs that keep a side channel
    /// (such as the properties codec) record it there.
    ///
    /// # Errors
    /// Returns [`CodecError::Decode`] for malformed input and
    /// [`CodecError::UnsupportedFormat`] if `store` lacks a capability the
    /// codec requires. `target` is unchanged on error.
    fn decode(
        &self,
        store: &mut dyn ConfigStore,
        input: &mut dyn Read,
        target: &mut Map,
    ) -> Result<(), CodecError>;

    /// Serialize `source` (or the keys of `store`, for flat formats) to `output`
    ///
    /// # Errors
    /// Returns [`CodecError::Encode`] if serialization or the output stream
    /// fails, [`CodecError::Store`] if a key cannot be read back from `store`
    /// and [`CodecError::UnsupportedFormat`] for a missing capability.
    fn encode(
        &self,
        store: &dyn ConfigStore,
        output: &mut dyn Write,
        source: &Map,
    ) -> Result<(), CodecError>;
}

/// Read all of `input`
fn read_input(input: &mut dyn Read, format: &'static str) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .map_err(|e| CodecError::decode(format, e))?;
    Ok(buf)
}

/// Read all of `input` as UTF-8 text
fn read_input_string(input: &mut dyn Read, format: &'static str) -> Result<String, CodecError> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .map_err(|e| CodecError::decode(format, e))?;
    Ok(text)
}

/// Write all of `bytes` to `output`
fn write_output(output: &mut dyn Write, bytes: &[u8], format: &'static str) -> Result<(), CodecError> {
    output
        .write_all(bytes)
        .and_then(|()| output.flush())
        .map_err(|e| CodecError::encode(format, e))
}
