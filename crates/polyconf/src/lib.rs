//! polyconf - multi-format configuration loading
//!
//! Reads a configuration document in any registered format into a canonical
//! tree, answers typed key queries against it, and writes it back out in the
//! same or another format.
//!
//! Supported formats: `json`, `toml`, `yaml`/`yml`,
//! `properties`/`props`/`prop`, `hcl`, `dotenv`/`env`, `ini`, `xml`.
//!
//! # Example
//!
//! ```rust
//! use polyconf::prelude::*;
//!
//! let config = Config::load("app", "yaml", "db:\n  port: 5432\n".as_bytes())?;
//! assert_eq!(config.get_int("db.port")?, 5432);
//!
//! let mut out = Vec::new();
//! let mut env = config.clone();
//! env.set_format("env");
//! env.write_to(CodecRegistry::global(), &mut out)?;
//! assert_eq!(String::from_utf8_lossy(&out), "DB_PORT=5432\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]

pub mod config;

pub use config::Config;
pub use polyconf_codec::{
    codecs, Codec, CodecError, CodecRegistry, ConfigReader, ConfigStore, Format, FormatDescriptor,
    PropertySet, PropertySetAccess, RegistryBuilder, StoreError,
};
pub use polyconf_value::{path, normalize, Direction, Map, Value};

/// Common imports for loading and querying configuration
pub mod prelude {
    pub use crate::{CodecRegistry, Config, ConfigReader, Format, Map, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
