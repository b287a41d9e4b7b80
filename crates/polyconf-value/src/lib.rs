//! polyconf canonical value model
//!
//! Every configuration format decodes into, and encodes from, the same tree
//! of [`Value`]s rooted at a [`Map`].
//!
//! # Core Concepts
//!
//! - [`Value`]: tagged union of strings, numbers, booleans, timestamps,
//!   durations, mappings and sequences
//! - [`path`]: dotted-key access that builds and heals nested structure
//! - [`normalize`]: attribute-key renaming between XML shape and canonical shape
//! - [`coerce`]: best-effort conversions behind typed getters
//!
//! # Example
//!
//! ```rust
//! use polyconf_value::{path, Map, Value};
//!
//! let mut root = Map::new();
//! path::deep_set(&mut root, "db.host", Value::from("localhost"));
//! path::deep_set(&mut root, "db.port", Value::from(5432_i64));
//!
//! assert_eq!(path::flatten_keys(&root), vec!["db.host", "db.port"]);
//! ```

#![warn(unreachable_pub)]

pub mod coerce;
pub mod error;
pub mod normalize;
pub mod path;
mod value;

pub use error::CoercionError;
pub use normalize::Direction;
pub use value::{Map, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
