//! `snowflake_external_table`

use super::tags::{self, TagConfig};
use super::{default_true, ensure_unchanged, non_empty, Resource, ResourceData};
use crate::error::ProviderError;
use crate::service::external_table::{
    AlterExternalTableOptions, CreateExternalTableOptions, ExternalTableColumn, ExternalTableFileFormat,
    TableFormat,
};
use crate::service::Client;
use crate::sql::{DataType, SchemaObjectIdentifier};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Every configurable attribute except `tag` forces replacement.
const FORCE_NEW: &[&str] = &[
    "name",
    "database",
    "schema",
    "table_format",
    "column",
    "location",
    "file_format",
    "pattern",
    "aws_sns_topic",
    "partition_by",
    "refresh_on_create",
    "auto_refresh",
    "copy_grants",
    "comment",
];

fn defaults() -> Value {
    json!({
        "table_format": "",
        "pattern": "",
        "aws_sns_topic": "",
        "partition_by": [],
        "refresh_on_create": true,
        "auto_refresh": true,
        "copy_grants": false,
        "comment": "",
        "tag": [],
    })
}

#[derive(Debug, Deserialize)]
struct ColumnConfig {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    #[serde(rename = "as")]
    expression: String,
}

#[derive(Debug, Deserialize)]
struct ExternalTableConfig {
    name: String,
    database: String,
    schema: String,
    #[serde(default)]
    table_format: Option<String>,
    #[serde(default)]
    column: Vec<ColumnConfig>,
    location: String,
    file_format: String,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    aws_sns_topic: Option<String>,
    #[serde(default)]
    partition_by: Vec<String>,
    #[serde(default = "default_true")]
    refresh_on_create: bool,
    #[serde(default = "default_true")]
    auto_refresh: bool,
    #[serde(default)]
    copy_grants: bool,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    tag: Vec<TagConfig>,
}

impl ExternalTableConfig {
    fn columns(&self) -> Result<Vec<ExternalTableColumn>, ProviderError> {
        if self.column.is_empty() {
            return Err(ProviderError::Resource(
                "column: at least one column is required".into(),
            ));
        }
        self.column
            .iter()
            .map(|c| {
                DataType::parse(&c.data_type)?;
                Ok(ExternalTableColumn::new(&c.name, &c.data_type, &c.expression))
            })
            .collect()
    }

    fn table_format(&self) -> Result<Option<TableFormat>, ProviderError> {
        match self.table_format.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Ok(Some(s.parse()?)),
            None => Ok(None),
        }
    }
}

pub struct ExternalTableResource;

#[async_trait]
impl Resource for ExternalTableResource {
    fn type_name(&self) -> &'static str {
        "snowflake_external_table"
    }

    async fn create(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let cfg: ExternalTableConfig = data.decode()?;
        let id = SchemaObjectIdentifier::new(&cfg.database, &cfg.schema, &cfg.name);
        let columns = cfg.columns()?;
        let table_format = cfg.table_format()?;

        let options = CreateExternalTableOptions {
            name: id.clone(),
            columns,
            partition_by: cfg.partition_by.clone(),
            location: cfg.location.clone(),
            refresh_on_create: Some(cfg.refresh_on_create),
            auto_refresh: Some(cfg.auto_refresh),
            file_format: Some(ExternalTableFileFormat::Raw(cfg.file_format.clone())),
            copy_grants: cfg.copy_grants,
            tags: tags::associations(&cfg.tag, &cfg.database, &cfg.schema),
            comment: non_empty(cfg.comment.clone()),
            ..Default::default()
        };
        let tables = client.external_tables();
        match table_format {
            Some(TableFormat::Delta) => {
                tables.create_delta_lake(&options).await?;
            }
            None => {
                tables
                    .create(&CreateExternalTableOptions {
                        pattern: non_empty(cfg.pattern),
                        aws_sns_topic: non_empty(cfg.aws_sns_topic),
                        ..options
                    })
                    .await?;
            }
        }

        data.set_id(id.resource_id());
        self.read(client, data).await
    }

    async fn read(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = SchemaObjectIdentifier::from_resource_id(data.id())?;
        let table = match client.external_tables().show_by_id(&id).await {
            Ok(table) => table,
            Err(ProviderError::NotFound(_)) => {
                tracing::debug!(id = %data.id(), "external table not found");
                data.set_id("");
                return Ok(());
            }
            Err(e) => {
                data.set_id("");
                return Err(e);
            }
        };

        data.set("name", table.name.as_str());
        data.set("owner", table.owner.as_str());
        Ok(())
    }

    async fn update(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        data.fill_defaults(defaults());
        ensure_unchanged(data, FORCE_NEW)?;
        let id = SchemaObjectIdentifier::from_resource_id(data.id())?;

        if data.has_change("tag") {
            let cfg: ExternalTableConfig = data.decode()?;
            let old: Vec<TagConfig> = data.prior_value("tag")?.unwrap_or_default();
            let (unset_tag, set_tag) = tags::diff(&old, &cfg.tag, id.database_name(), id.schema_name());
            let tables = client.external_tables();

            if !unset_tag.is_empty() {
                tables
                    .alter(&AlterExternalTableOptions {
                        name: id.clone(),
                        unset_tag,
                        ..Default::default()
                    })
                    .await?;
            }
            if !set_tag.is_empty() {
                tables
                    .alter(&AlterExternalTableOptions {
                        name: id.clone(),
                        set_tag,
                        ..Default::default()
                    })
                    .await?;
            }
        }

        self.read(client, data).await
    }

    async fn delete(&self, client: &Client, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = SchemaObjectIdentifier::from_resource_id(data.id())?;
        client.external_tables().delete(&id).await?;
        data.set_id("");
        Ok(())
    }
}
