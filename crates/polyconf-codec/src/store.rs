//! Store capabilities consumed by codecs
//!
//! Codecs never own configuration data. They read from, and write side
//! channels into, whatever store the caller hands them through these traits:
//!
//! - [`ConfigReader`]: key enumeration and typed retrieval (required)
//! - [`ConfigStore`]: a reader that may expose optional capabilities
//! - [`PropertySetAccess`]: the property-set side channel used by the
//!   properties codec to keep comments and ordering

use crate::error::StoreError;
use crate::properties::PropertySet;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use polyconf_value::{coerce, CoercionError, Map, Value};
use std::time::Duration;

/// Read access to a configuration store
///
/// Only [`all_keys`](Self::all_keys) and [`get`](Self::get) are required;
/// every typed getter coerces the stored value on a best-effort basis.
pub trait ConfigReader {
    /// Every fully qualified key currently set
    fn all_keys(&self) -> Vec<String>;

    /// Raw value stored under a dotted key
    ///
    /// # Errors
    /// Returns [`StoreError::KeyAbsent`] if nothing is stored under `key`
    fn get(&self, key: &str) -> Result<&Value, StoreError>;

    /// Value as string
    fn get_string(&self, key: &str) -> Result<String, StoreError> {
        coerced(self, key, coerce::to_string)
    }

    /// Value as boolean
    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        coerced(self, key, coerce::to_bool)
    }

    /// Value as platform integer
    fn get_int(&self, key: &str) -> Result<i64, StoreError> {
        coerced(self, key, coerce::to_i64)
    }

    /// Value as 32-bit integer
    fn get_int32(&self, key: &str) -> Result<i32, StoreError> {
        coerced(self, key, coerce::to_i32)
    }

    /// Value as 64-bit integer
    fn get_int64(&self, key: &str) -> Result<i64, StoreError> {
        coerced(self, key, coerce::to_i64)
    }

    /// Value as 64-bit float
    fn get_float64(&self, key: &str) -> Result<f64, StoreError> {
        coerced(self, key, coerce::to_f64)
    }

    /// Value as timestamp
    fn get_time(&self, key: &str) -> Result<DateTime<FixedOffset>, StoreError> {
        coerced(self, key, coerce::to_timestamp)
    }

    /// Value as duration
    fn get_duration(&self, key: &str) -> Result<Duration, StoreError> {
        coerced(self, key, coerce::to_duration)
    }

    /// Value as list of strings
    fn get_string_slice(&self, key: &str) -> Result<Vec<String>, StoreError> {
        coerced(self, key, coerce::to_string_slice)
    }

    /// Subtree as mapping
    fn get_string_map(&self, key: &str) -> Result<Map, StoreError> {
        coerced(self, key, coerce::to_string_map)
    }

    /// Subtree as mapping of strings
    fn get_string_map_string(&self, key: &str) -> Result<IndexMap<String, String>, StoreError> {
        coerced(self, key, coerce::to_string_map_string)
    }

    /// Subtree as mapping of string lists
    fn get_string_map_string_slice(
        &self,
        key: &str,
    ) -> Result<IndexMap<String, Vec<String>>, StoreError> {
        coerced(self, key, coerce::to_string_map_string_slice)
    }

    /// Size such as `64kb` in bytes
    fn get_size_in_bytes(&self, key: &str) -> Result<u64, StoreError> {
        coerced(self, key, coerce::to_size_in_bytes)
    }
}

fn coerced<R, T>(
    reader: &R,
    key: &str,
    convert: fn(&Value) -> Result<T, CoercionError>,
) -> Result<T, StoreError>
where
    R: ConfigReader + ?Sized,
{
    let value = reader.get(key)?;
    convert(value).map_err(|source| StoreError::coercion(key, source))
}

/// A store handed to codecs
///
/// Optional capabilities are discovered through accessors returning `None`
/// when the store does not provide them, so codecs can refuse cleanly
/// instead of degrading.
pub trait ConfigStore: ConfigReader {
    /// Property-set side channel, if supported
    fn property_access(&self) -> Option<&dyn PropertySetAccess> {
        None
    }

    /// Mutable property-set side channel, if supported
    fn property_access_mut(&mut self) -> Option<&mut dyn PropertySetAccess> {
        None
    }
}

/// Property-set side channel
///
/// Holds the parsed properties document between decode and encode so
/// comments and key order survive a round trip.
pub trait PropertySetAccess {
    /// Current property set, if one has been recorded
    fn property_set(&self) -> Option<&PropertySet>;

    /// Record a property set
    fn set_property_set(&mut self, set: PropertySet);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use polyconf_value::path::deep_set;

    fn store() -> TestStore {
        let mut data = Map::new();
        deep_set(&mut data, "server.port", Value::from("8080"));
        deep_set(&mut data, "server.debug", Value::from("true"));
        deep_set(&mut data, "server.timeout", Value::from("90s"));
        deep_set(&mut data, "server.started", Value::from("2024-01-02T03:04:05Z"));
        deep_set(&mut data, "server.buffer", Value::from("64kb"));
        deep_set(&mut data, "server.tags", Value::from(vec!["a", "b"]));
        deep_set(&mut data, "server.ratio", Value::from(0.25));
        TestStore::new(data)
    }

    #[test]
    fn typed_getters_coerce_strings() {
        let store = store();
        assert_eq!(store.get_int("server.port").unwrap(), 8080);
        assert_eq!(store.get_int32("server.port").unwrap(), 8080);
        assert_eq!(store.get_int64("server.port").unwrap(), 8080);
        assert!(store.get_bool("server.debug").unwrap());
        assert_eq!(
            store.get_duration("server.timeout").unwrap(),
            Duration::from_secs(90)
        );
        assert_eq!(
            store.get_time("server.started").unwrap().timestamp(),
            1_704_164_645
        );
        assert_eq!(store.get_size_in_bytes("server.buffer").unwrap(), 65_536);
        assert_eq!(store.get_string_slice("server.tags").unwrap(), vec!["a", "b"]);
        assert!((store.get_float64("server.ratio").unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn map_getters() {
        let store = store();
        let map = store.get_string_map("server").unwrap();
        assert_eq!(map.len(), 7);

        let strings = store.get_string_map_string("server").unwrap();
        assert_eq!(strings["port"], "8080");

        let slices = store.get_string_map_string_slice("server").unwrap();
        assert_eq!(slices["tags"], vec!["a", "b"]);
    }

    #[test]
    fn absent_key_is_reported() {
        let store = store();
        assert!(matches!(
            store.get_string("server.missing"),
            Err(StoreError::KeyAbsent(key)) if key == "server.missing"
        ));
    }

    #[test]
    fn failed_coercion_is_reported() {
        let store = store();
        assert!(matches!(
            store.get_int("server.debug"),
            Err(StoreError::Coercion { key, .. }) if key == "server.debug"
        ));
        assert!(matches!(
            store.get_string("server"),
            Err(StoreError::Coercion { .. })
        ));
    }

    #[test]
    fn capability_absent_by_default() {
        struct Plain(Map);

        impl ConfigReader for Plain {
            fn all_keys(&self) -> Vec<String> {
                polyconf_value::path::flatten_keys(&self.0)
            }

            fn get(&self, key: &str) -> Result<&Value, StoreError> {
                self.0.get(key).ok_or_else(|| StoreError::key_absent(key))
            }
        }

        impl ConfigStore for Plain {}

        let mut store = Plain(Map::new());
        assert!(store.property_access().is_none());
        assert!(store.property_access_mut().is_none());
        assert!(TestStore::empty().property_access().is_some());
    }
}
