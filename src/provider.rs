//! Provider: the shared client plus the registry of resource types.

use crate::error::ProviderError;
use crate::resources::{DatabaseResource, ExternalTableResource, Resource, SchemaResource};
use crate::service::Client;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct Provider {
    client: Client,
    resources: Arc<BTreeMap<&'static str, Arc<dyn Resource>>>,
}

impl Provider {
    /// Provider with every built-in resource type registered.
    pub fn new(client: Client) -> Self {
        let builtin: [Arc<dyn Resource>; 3] = [
            Arc::new(DatabaseResource),
            Arc::new(SchemaResource),
            Arc::new(ExternalTableResource),
        ];
        let resources = builtin.into_iter().map(|r| (r.type_name(), r)).collect();
        Provider {
            client,
            resources: Arc::new(resources),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>, ProviderError> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("resource type {}", type_name)))
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }
}
