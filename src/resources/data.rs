//! Resource data: id, desired attributes and prior state for change detection.

use crate::error::ProviderError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Serialized form exchanged with the configuration framework.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceData {
    id: String,
    attributes: Map<String, Value>,
    prior: Map<String, Value>,
}

impl ResourceData {
    /// Desired attributes for a resource that does not exist yet.
    pub fn new(attributes: Map<String, Value>) -> Self {
        ResourceData {
            id: String::new(),
            attributes,
            prior: Map::new(),
        }
    }

    /// Existing resource; `attributes` is the last known state.
    pub fn existing(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        ResourceData {
            id: id.into(),
            prior: attributes.clone(),
            attributes,
        }
    }

    /// Existing resource moving from `prior` to the desired `attributes`.
    pub fn planned(id: impl Into<String>, prior: Map<String, Value>, attributes: Map<String, Value>) -> Self {
        ResourceData {
            id: id.into(),
            attributes,
            prior,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// An empty id tells the framework the object no longer exists.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.attributes.get(key).and_then(Value::as_i64)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Fill absent or null keys on both the desired and prior side with their
    /// declared defaults, so an omitted attribute equals its default.
    pub fn fill_defaults(&mut self, defaults: Value) {
        let Value::Object(defaults) = defaults else {
            return;
        };
        for (key, value) in defaults {
            for side in [&mut self.attributes, &mut self.prior] {
                if side.get(&key).map_or(true, Value::is_null) {
                    side.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// True when the desired value differs from the prior one. Null and missing compare equal.
    pub fn has_change(&self, key: &str) -> bool {
        let old = self.prior.get(key).filter(|v| !v.is_null());
        let new = self.attributes.get(key).filter(|v| !v.is_null());
        old != new
    }

    /// Decode the desired attributes into a typed configuration.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
            .map_err(|e| ProviderError::Resource(e.to_string()))
    }

    /// Decode one prior attribute, `None` when absent or null.
    pub fn prior_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ProviderError> {
        match self.prior.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| ProviderError::Resource(format!("{}: {}", key, e))),
        }
    }

    pub fn into_state(self) -> ResourceState {
        ResourceState {
            id: self.id,
            attributes: self.attributes,
        }
    }
}
