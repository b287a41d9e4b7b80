//! In-crate store used by unit tests

use crate::error::StoreError;
use crate::properties::PropertySet;
use crate::store::{ConfigReader, ConfigStore, PropertySetAccess};
use polyconf_value::{path, Map, Value};

/// Map-backed store with an optional property-set capability
#[derive(Debug, Default)]
pub(crate) struct TestStore {
    pub(crate) data: Map,
    pub(crate) properties: Option<PropertySet>,
    supports_properties: bool,
}

impl TestStore {
    pub(crate) fn new(data: Map) -> Self {
        Self {
            data,
            properties: None,
            supports_properties: true,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Map::new())
    }

    pub(crate) fn without_properties(mut self) -> Self {
        self.supports_properties = false;
        self
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        path::deep_set(&mut self.data, key, value.into());
        self
    }
}

impl ConfigReader for TestStore {
    fn all_keys(&self) -> Vec<String> {
        path::flatten_keys(&self.data)
    }

    fn get(&self, key: &str) -> Result<&Value, StoreError> {
        path::deep_get(&self.data, &path::split_key(key)).ok_or_else(|| StoreError::key_absent(key))
    }
}

impl ConfigStore for TestStore {
    fn property_access(&self) -> Option<&dyn PropertySetAccess> {
        if self.supports_properties {
            Some(self)
        } else {
            None
        }
    }

    fn property_access_mut(&mut self) -> Option<&mut dyn PropertySetAccess> {
        if self.supports_properties {
            Some(self)
        } else {
            None
        }
    }
}

impl PropertySetAccess for TestStore {
    fn property_set(&self) -> Option<&PropertySet> {
        self.properties.as_ref()
    }

    fn set_property_set(&mut self, set: PropertySet) {
        self.properties = Some(set);
    }
}
