//! `snowflake_database`

use super::{default_retention, ensure_unchanged, explicit_days, non_empty, Resource, ResourceData};
use crate::error::ProviderError;
use crate::service::database::{
    AlterDatabaseOptions, CreateDatabaseOptions, DatabaseSet, DatabaseUnset,
};
use crate::service::Client;
use crate::sql::AccountObjectIdentifier;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    name: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    is_transient: bool,
    #[serde(default = "default_retention")]
    data_retention_time_in_days: i64,
}

/// Values the config falls back to when an attribute is omitted.
fn defaults() -> Value {
    json!({ "comment": "", "is_transient": false, "data_retention_time_in_days": -1 })
}

pub struct DatabaseResource;

#[async_trait]
impl Resource for DatabaseResource {
    fn type_name(&self) -> &'static str {
        "snowflake_database"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let cfg: DatabaseConfig = data.decode()?;
        let id = AccountObjectIdentifier::new(&cfg.name);
        client
            .databases()
            .create(&CreateDatabaseOptions {
                transient: cfg.is_transient,
                name: id.clone(),
                data_retention_time_in_days: explicit_days(cfg.data_retention_time_in_days)?,
                comment: non_empty(cfg.comment),
                ..Default::default()
            })
            .await?;
        data.set_id(id.resource_id());
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = AccountObjectIdentifier::from_resource_id(data.id())?;
        let Some(db) = client.databases().read(&id).await? else {
            tracing::debug!(id = %data.id(), "database not found");
            data.set_id("");
            return Ok(());
        };

        data.set("name", db.name.as_str());
        data.set("comment", db.comment.as_str());
        data.set("is_transient", db.is_transient());
        data.set("owner", db.owner.as_str());
        data.set("created_on", db.created_on.to_rfc3339());
        // -1 stays -1; the account-level default is not visible here.
        if data.get_i64("data_retention_time_in_days").unwrap_or(-1) != -1 {
            data.set("data_retention_time_in_days", db.retention_time);
        }
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        data.fill_defaults(defaults());
        ensure_unchanged(data, &["is_transient"])?;
        let cfg: DatabaseConfig = data.decode()?;
        let mut id = AccountObjectIdentifier::from_resource_id(data.id())?;
        let databases = client.databases();

        if data.has_change("name") {
            let new_id = AccountObjectIdentifier::new(&cfg.name);
            databases
                .alter(&AlterDatabaseOptions {
                    name: id.clone(),
                    new_name: Some(new_id.clone()),
                    ..Default::default()
                })
                .await?;
            data.set_id(new_id.resource_id());
            id = new_id;
        }

        let mut set = DatabaseSet::default();
        let mut unset = DatabaseUnset::default();
        if data.has_change("comment") {
            match non_empty(cfg.comment) {
                Some(c) => set.comment = Some(c),
                None => unset.comment = true,
            }
        }
        if data.has_change("data_retention_time_in_days") {
            match explicit_days(cfg.data_retention_time_in_days)? {
                Some(d) => set.data_retention_time_in_days = Some(d),
                None => unset.data_retention_time_in_days = true,
            }
        }
        if set != DatabaseSet::default() {
            databases
                .alter(&AlterDatabaseOptions {
                    name: id.clone(),
                    set: Some(set),
                    ..Default::default()
                })
                .await?;
        }
        if unset != DatabaseUnset::default() {
            databases
                .alter(&AlterDatabaseOptions {
                    name: id.clone(),
                    unset: Some(unset),
                    ..Default::default()
                })
                .await?;
        }

        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = AccountObjectIdentifier::from_resource_id(data.id())?;
        client.databases().delete(&id).await?;
        data.set_id("");
        Ok(())
    }
}
