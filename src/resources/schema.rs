//! `snowflake_schema`

use super::tags::{self, TagConfig};
use super::{default_retention, ensure_unchanged, explicit_days, non_empty, Resource, ResourceData};
use crate::error::ProviderError;
use crate::service::schema::{AlterSchemaOptions, CreateSchemaOptions, SchemaSet, SchemaUnset};
use crate::service::Client;
use crate::sql::DatabaseObjectIdentifier;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct SchemaConfig {
    name: String,
    database: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    is_transient: bool,
    #[serde(default)]
    is_managed: bool,
    #[serde(default = "default_retention")]
    data_retention_days: i64,
    #[serde(default)]
    tag: Vec<TagConfig>,
}

fn defaults() -> Value {
    json!({
        "comment": "",
        "is_transient": false,
        "is_managed": false,
        "data_retention_days": -1,
        "tag": [],
    })
}

/// A schema's tags live in some other schema, so `schema` is required.
/// `database` falls back to the tagged schema's database.
fn check_tags(tags: &[TagConfig]) -> Result<(), ProviderError> {
    match tags.iter().find(|t| t.schema.as_deref().map_or(true, str::is_empty)) {
        Some(t) => Err(ProviderError::Resource(format!(
            "tag '{}': schema is required for schema tags",
            t.name
        ))),
        None => Ok(()),
    }
}

pub struct SchemaResource;

#[async_trait]
impl Resource for SchemaResource {
    fn type_name(&self) -> &'static str {
        "snowflake_schema"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let cfg: SchemaConfig = data.decode()?;
        check_tags(&cfg.tag)?;
        let id = DatabaseObjectIdentifier::new(&cfg.database, &cfg.name);
        client
            .schemas()
            .create(&CreateSchemaOptions {
                transient: cfg.is_transient,
                name: id.clone(),
                with_managed_access: cfg.is_managed,
                data_retention_time_in_days: explicit_days(cfg.data_retention_days)?,
                tags: tags::associations(&cfg.tag, &cfg.database, ""),
                comment: non_empty(cfg.comment),
                ..Default::default()
            })
            .await?;
        data.set_id(id.resource_id());
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = DatabaseObjectIdentifier::from_resource_id(data.id())?;
        let Some(schema) = client.schemas().read(&id).await? else {
            tracing::debug!(id = %data.id(), "schema not found");
            data.set_id("");
            return Ok(());
        };

        data.set("name", schema.name.as_str());
        data.set("database", id.database_name());
        data.set("comment", schema.comment.as_str());
        data.set("is_transient", schema.is_transient());
        data.set("is_managed", schema.is_managed_access());
        data.set("owner", schema.owner.as_str());

        // -1 means "inherit from the database"; keep it while the schema still matches the database.
        let configured = data.get_i64("data_retention_days").unwrap_or(-1);
        let inherited = configured == -1
            && client.databases().show_by_id(&id.database_id()).await?.retention_time == schema.retention_time;
        data.set("data_retention_days", if inherited { -1 } else { schema.retention_time });
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        data.fill_defaults(defaults());
        ensure_unchanged(data, &["database", "is_transient"])?;
        let cfg: SchemaConfig = data.decode()?;
        check_tags(&cfg.tag)?;
        let mut id = DatabaseObjectIdentifier::from_resource_id(data.id())?;
        let schemas = client.schemas();
        let alter = |id: &DatabaseObjectIdentifier| AlterSchemaOptions {
            name: id.clone(),
            ..Default::default()
        };

        if data.has_change("name") {
            let new_id = DatabaseObjectIdentifier::new(id.database_name(), &cfg.name);
            schemas
                .alter(&AlterSchemaOptions {
                    new_name: Some(new_id.clone()),
                    ..alter(&id)
                })
                .await?;
            data.set_id(new_id.resource_id());
            id = new_id;
        }

        let mut set = SchemaSet::default();
        let mut unset = SchemaUnset::default();
        if data.has_change("comment") {
            match non_empty(cfg.comment) {
                Some(c) => set.comment = Some(c),
                None => unset.comment = true,
            }
        }
        if data.has_change("data_retention_days") {
            match explicit_days(cfg.data_retention_days)? {
                Some(d) => set.data_retention_time_in_days = Some(d),
                None => unset.data_retention_time_in_days = true,
            }
        }
        if set != SchemaSet::default() {
            schemas
                .alter(&AlterSchemaOptions {
                    set: Some(set),
                    ..alter(&id)
                })
                .await?;
        }
        if unset != SchemaUnset::default() {
            schemas
                .alter(&AlterSchemaOptions {
                    unset: Some(unset),
                    ..alter(&id)
                })
                .await?;
        }

        if data.has_change("is_managed") {
            schemas
                .alter(&AlterSchemaOptions {
                    enable_managed_access: cfg.is_managed,
                    disable_managed_access: !cfg.is_managed,
                    ..alter(&id)
                })
                .await?;
        }

        if data.has_change("tag") {
            let old: Vec<TagConfig> = data.prior_value("tag")?.unwrap_or_default();
            let (unset_tag, set_tag) = tags::diff(&old, &cfg.tag, id.database_name(), "");
            if !unset_tag.is_empty() {
                schemas
                    .alter(&AlterSchemaOptions {
                        unset_tag,
                        ..alter(&id)
                    })
                    .await?;
            }
            if !set_tag.is_empty() {
                schemas
                    .alter(&AlterSchemaOptions {
                        set_tag,
                        ..alter(&id)
                    })
                    .await?;
            }
        }

        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = DatabaseObjectIdentifier::from_resource_id(data.id())?;
        client.schemas().delete(&id).await?;
        data.set_id("");
        Ok(())
    }
}
