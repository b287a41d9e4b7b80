//! Dotted key paths over nested mappings
//!
//! Flat formats (INI sections, properties files, dotenv) express nesting with
//! `.`-delimited keys. These helpers translate between such keys and the
//! nested [`Map`] tree.
//!
//! Writes never fail: when a longer path needs nesting where a scalar is
//! stored, the scalar is discarded in favour of a fresh mapping. Conflicts
//! resolve by write order, so a later shorter key replaces a mapping built
//! by earlier longer keys.

use crate::value::{Map, Value};

/// Key path separator
pub const SEPARATOR: char = '.';

/// Walk `path` from `root`, creating missing mappings along the way
///
/// Returns the mapping reached after the last segment; the caller writes its
/// leaf into it. A segment that currently holds a non-mapping value is
/// overwritten with an empty mapping so the walk can continue. An empty path
/// returns `root` itself.
///
/// # Examples
/// ```
/// use polyconf_value::{path::deep_search, Map, Value};
///
/// let mut root = Map::new();
/// deep_search(&mut root, &["db", "primary"]).insert("host".into(), Value::from("localhost"));
/// assert!(root["db"].as_map().unwrap()["primary"].is_map());
/// ```
pub fn deep_search<'a, S: AsRef<str>>(root: &'a mut Map, path: &[S]) -> &'a mut Map {
    let mut current = root;
    for segment in path {
        let segment = segment.as_ref();
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(Value::empty_map);
        current = ensure_map(slot, segment);
    }
    current
}

fn ensure_map<'a>(slot: &'a mut Value, segment: &str) -> &'a mut Map {
    if !slot.is_map() {
        tracing::trace!(
            segment,
            replaced = slot.type_name(),
            "replacing scalar with mapping to continue nested path"
        );
        *slot = Value::empty_map();
    }
    match slot {
        Value::Map(map) => map,
        _ => unreachable!("slot was just replaced with a mapping"),
    }
}

/// Store `value` under a dotted key, building nested mappings as needed
///
/// The leaf is overwritten whatever it held. Writing `a.b` then `a` leaves
/// only `a`; writing `a` then `a.b` leaves only `a.b`.
pub fn deep_set(root: &mut Map, key: &str, value: Value) {
    let segments: Vec<&str> = key.split(SEPARATOR).collect();
    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };
    deep_search(root, parents).insert((*leaf).to_string(), value);
}

/// Resolve a segment path without modifying the tree
///
/// Each segment is matched exactly first, then ignoring ASCII case.
#[must_use]
pub fn deep_get<'a, S: AsRef<str>>(root: &'a Map, path: &[S]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for segment in parents {
        current = lookup(current, segment.as_ref())?.as_map()?;
    }
    lookup(current, last.as_ref())
}

fn lookup<'a>(map: &'a Map, segment: &str) -> Option<&'a Value> {
    map.get(segment).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(segment))
            .map(|(_, value)| value)
    })
}

/// Split a dotted key into its segments
#[inline]
#[must_use]
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(SEPARATOR).collect()
}

/// Split a dotted key at its last separator into `(prefix, leaf)`
///
/// Keys without a separator have no prefix.
#[inline]
#[must_use]
pub fn split_last(key: &str) -> (Option<&str>, &str) {
    match key.rfind(SEPARATOR) {
        Some(idx) => (Some(&key[..idx]), &key[idx + 1..]),
        None => (None, key),
    }
}

/// Fully qualified keys of every non-mapping leaf, depth first
///
/// Sequences count as leaves; empty mappings contribute no key.
#[must_use]
pub fn flatten_keys(root: &Map) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(root, None, &mut keys);
    keys
}

fn collect_keys(map: &Map, prefix: Option<&str>, keys: &mut Vec<String>) {
    for (key, value) in map {
        let full = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Map(nested) => collect_keys(nested, Some(&full), keys),
            _ => keys.push(full),
        }
    }
}
