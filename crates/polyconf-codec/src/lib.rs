//! polyconf codecs
//!
//! Decoders and encoders between configuration grammars and the canonical
//! [`Map`](polyconf_value::Map) tree, plus the registry that selects them by
//! format name.
//!
//! # Core Concepts
//!
//! - [`Codec`]: decode a byte stream into a mapping and encode it back
//! - [`CodecRegistry`]: immutable name-to-codec table, built through a
//!   [`RegistryBuilder`]
//! - [`ConfigStore`]: the store a codec works against, with optional
//!   capabilities such as the [`PropertySetAccess`] side channel
//!
//! # Example
//!
//! ```rust,ignore
//! use polyconf_codec::CodecRegistry;
//!
//! let codec = CodecRegistry::global().lookup("yml")?;
//! codec.decode(&mut store, &mut input, &mut target)?;
//! ```

#![warn(unreachable_pub)]

pub mod codecs;
pub mod error;
pub mod format;
pub mod properties;
pub mod registry;
pub mod store;

#[cfg(test)]
mod testing;

pub use codecs::{Codec, FormatDescriptor};
pub use error::{CodecError, CodecResult, StoreError};
pub use format::Format;
pub use properties::{Property, PropertySet};
pub use registry::{CodecRegistry, RegistryBuilder};
pub use store::{ConfigReader, ConfigStore, PropertySetAccess};

/// Common imports for codec implementors
pub mod prelude {
    pub use crate::codecs::{Codec, FormatDescriptor};
    pub use crate::error::{CodecError, CodecResult, StoreError};
    pub use crate::store::{ConfigReader, ConfigStore, PropertySetAccess};
    pub use polyconf_value::{Map, Value};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
