//! Built-in format identifiers

use crate::codecs::{
    Codec, DotenvCodec, FormatDescriptor, HclCodec, IniCodec, JsonCodec, PropertiesCodec,
    TomlCodec, XmlCodec, YamlCodec,
};
use crate::error::CodecError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A built-in configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON
    Json,
    /// TOML
    Toml,
    /// YAML (`yaml`, `yml`)
    Yaml,
    /// Java properties (`properties`, `props`, `prop`)
    Properties,
    /// HashiCorp configuration language
    Hcl,
    /// Dotenv (`dotenv`, `env`)
    Dotenv,
    /// INI
    Ini,
    /// XML
    Xml,
}

impl Format {
    /// Every built-in format
    pub const ALL: [Format; 8] = [
        Format::Json,
        Format::Toml,
        Format::Yaml,
        Format::Properties,
        Format::Hcl,
        Format::Dotenv,
        Format::Ini,
        Format::Xml,
    ];

    /// Canonical name and aliases
    #[must_use]
    pub fn descriptor(self) -> FormatDescriptor {
        match self {
            Self::Json => JsonCodec::DESCRIPTOR,
            Self::Toml => TomlCodec::DESCRIPTOR,
            Self::Yaml => YamlCodec::DESCRIPTOR,
            Self::Properties => PropertiesCodec::DESCRIPTOR,
            Self::Hcl => HclCodec::DESCRIPTOR,
            Self::Dotenv => DotenvCodec::DESCRIPTOR,
            Self::Ini => IniCodec::DESCRIPTOR,
            Self::Xml => XmlCodec::DESCRIPTOR,
        }
    }

    /// Canonical name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Fresh codec for this format
    #[must_use]
    pub fn codec(self) -> Arc<dyn Codec> {
        match self {
            Self::Json => Arc::new(JsonCodec),
            Self::Toml => Arc::new(TomlCodec),
            Self::Yaml => Arc::new(YamlCodec),
            Self::Properties => Arc::new(PropertiesCodec),
            Self::Hcl => Arc::new(HclCodec),
            Self::Dotenv => Arc::new(DotenvCodec),
            Self::Ini => Arc::new(IniCodec),
            Self::Xml => Arc::new(XmlCodec),
        }
    }
}

impl FromStr for Format {
    type Err = CodecError;

    /// Match a canonical name or alias exactly; names are case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.descriptor().matches(s))
            .ok_or_else(|| CodecError::unknown_format(s))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
