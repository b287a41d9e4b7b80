//! Attribute-key normalization
//!
//! XML-shaped trees mark attributes inline with a `-` key prefix (`-id`),
//! which collides with plain keys in dotted paths and environment names. The
//! canonical form spells them `attr_id` instead. [`normalize`] converts in
//! either direction and is its own inverse for trees that only use the
//! respective convention.

use crate::value::{Map, Value};

/// Inline attribute marker used by XML-shaped trees
pub const ATTRIBUTE_MARKER: &str = "-";

/// Canonical prefix for attribute keys
pub const ATTRIBUTE_PREFIX: &str = "attr_";

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Format shape to canonical shape (decode)
    Inbound,
    /// Canonical shape to format shape (encode)
    Outbound,
}

impl Direction {
    /// The opposite direction
    #[inline]
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Inbound => Self::Outbound,
            Self::Outbound => Self::Inbound,
        }
    }
}

/// Rename attribute keys throughout `value`
///
/// Mappings are rebuilt and sequences keep their order and length. Scalars
/// pass through unchanged.
#[must_use]
pub fn normalize(value: &Value, direction: Direction) -> Value {
    match value {
        Value::Map(map) => Value::Map(normalize_map(map, direction)),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| normalize(item, direction))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Rename attribute keys of a mapping and everything below it
#[must_use]
pub fn normalize_map(map: &Map, direction: Direction) -> Map {
    map.iter()
        .map(|(key, value)| (rename_key(key, direction), normalize(value, direction)))
        .collect()
}

fn rename_key(key: &str, direction: Direction) -> String {
    let (from, to) = match direction {
        Direction::Inbound => (ATTRIBUTE_MARKER, ATTRIBUTE_PREFIX),
        Direction::Outbound => (ATTRIBUTE_PREFIX, ATTRIBUTE_MARKER),
    };
    match key.strip_prefix(from) {
        Some(rest) => format!("{to}{rest}"),
        None => key.to_string(),
    }
}
