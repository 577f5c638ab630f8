//! Resource adapters: translate resource data into entity-service calls and back.

mod data;
pub mod database;
pub mod external_table;
pub mod schema;
pub mod tags;

pub use data::{ResourceData, ResourceState};
pub use database::DatabaseResource;
pub use external_table::ExternalTableResource;
pub use schema::SchemaResource;

use crate::error::ProviderError;
use crate::service::Client;
use async_trait::async_trait;

/// Lifecycle of one resource type. Each call receives the shared client and
/// the resource data to read from and write back to.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name as used in configurations, e.g. `snowflake_schema`.
    fn type_name(&self) -> &'static str;

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError>;

    /// Refresh attributes from the warehouse. Clears the id when the object is gone.
    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError>;

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError>;

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError>;
}

/// Reject changes to attributes that can only be applied by replacing the object.
pub(crate) fn ensure_unchanged(data: &ResourceData, keys: &[&str]) -> Result<(), ProviderError> {
    for key in keys {
        if data.has_change(key) {
            return Err(ProviderError::Resource(format!(
                "changing '{}' requires replacing the resource",
                key
            )));
        }
    }
    Ok(())
}

/// Treat empty strings like unset values.
pub(crate) fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

/// Retention attributes use -1 for "inherit from parent".
pub(crate) fn explicit_days(days: i64) -> Result<Option<u32>, ProviderError> {
    match days {
        -1 => Ok(None),
        d if d >= 0 => u32::try_from(d)
            .map(Some)
            .map_err(|_| ProviderError::Resource(format!("retention days out of range: {}", d))),
        d => Err(ProviderError::Resource(format!(
            "retention days must be -1 or non-negative, got {}",
            d
        ))),
    }
}

pub(crate) fn default_retention() -> i64 {
    -1
}

pub(crate) fn default_true() -> bool {
    true
}
