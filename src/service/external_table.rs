//! External tables: options, statement formatting, row mapping and service.

use crate::error::{OptionsError, ProviderError};
use crate::service::Client;
use crate::sql::row::loose;
use crate::sql::tag::{set_tag_clause, unset_tag_clause, validate_tags, validate_unset_tags, with_tag_clause};
use crate::sql::{
    bool_literal, exactly_one, quoted, quoted_literal, scan_all, AccountObjectIdentifier, DataType,
    DatabaseObjectIdentifier, SchemaObjectIdentifier, SqlStatement, StatementBuf, TagAssociation,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalTable {
    pub created_on: DateTime<Utc>,
    pub name: String,
    pub database_name: String,
    pub schema_name: String,
    pub invalid: bool,
    pub invalid_reason: String,
    pub owner: String,
    pub comment: String,
    pub stage: String,
    pub location: String,
    pub file_format_name: String,
    pub file_format_type: String,
    pub cloud: String,
    pub region: String,
    pub notification_channel: String,
    pub last_refreshed_on: DateTime<Utc>,
    pub table_format: String,
    pub last_refresh_details: String,
    pub owner_role_type: String,
}

impl ExternalTable {
    pub fn id(&self) -> SchemaObjectIdentifier {
        SchemaObjectIdentifier::new(self.database_name.clone(), self.schema_name.clone(), self.name.clone())
    }
}

#[derive(Deserialize)]
struct ExternalTableRow {
    #[serde(default, deserialize_with = "loose::timestamp")]
    created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    database_name: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    schema_name: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    invalid: Option<bool>,
    #[serde(default, deserialize_with = "loose::string")]
    invalid_reason: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    owner: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    comment: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    stage: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    file_format_name: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    file_format_type: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    cloud: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    region: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    notification_channel: Option<String>,
    #[serde(default, deserialize_with = "loose::timestamp")]
    last_refreshed_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::string")]
    table_format: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    last_refresh_details: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    owner_role_type: Option<String>,
}

impl From<ExternalTableRow> for ExternalTable {
    fn from(r: ExternalTableRow) -> Self {
        ExternalTable {
            created_on: r.created_on.unwrap_or_default(),
            name: r.name.unwrap_or_default(),
            database_name: r.database_name.unwrap_or_default(),
            schema_name: r.schema_name.unwrap_or_default(),
            invalid: r.invalid.unwrap_or_default(),
            invalid_reason: r.invalid_reason.unwrap_or_default(),
            owner: r.owner.unwrap_or_default(),
            comment: r.comment.unwrap_or_default(),
            stage: r.stage.unwrap_or_default(),
            location: r.location.unwrap_or_default(),
            file_format_name: r.file_format_name.unwrap_or_default(),
            file_format_type: r.file_format_type.unwrap_or_default(),
            cloud: r.cloud.unwrap_or_default(),
            region: r.region.unwrap_or_default(),
            notification_channel: r.notification_channel.unwrap_or_default(),
            last_refreshed_on: r.last_refreshed_on.unwrap_or_default(),
            table_format: r.table_format.unwrap_or_default(),
            last_refresh_details: r.last_refresh_details.unwrap_or_default(),
            owner_role_type: r.owner_role_type.unwrap_or_default(),
        }
    }
}

/// `<name> <type> AS (<expression>) [NOT NULL]`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalTableColumn {
    pub name: String,
    pub data_type: String,
    pub as_expression: String,
    pub not_null: bool,
}

impl ExternalTableColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, as_expression: impl Into<String>) -> Self {
        ExternalTableColumn {
            name: name.into(),
            data_type: data_type.into(),
            as_expression: as_expression.into(),
            not_null: false,
        }
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.name.is_empty() {
            return Err(OptionsError::Empty("column name"));
        }
        if self.as_expression.is_empty() {
            return Err(OptionsError::Empty("column expression"));
        }
        DataType::parse(&self.data_type).map(|_| ())
    }

    fn render(&self) -> String {
        let data_type = DataType::parse(&self.data_type)
            .map(|t| t.to_string())
            .unwrap_or_else(|_| self.data_type.clone());
        let mut s = format!("{} {} AS ({})", quoted(&self.name), data_type, self.as_expression);
        if self.not_null {
            s.push_str(" NOT NULL");
        }
        s
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExternalTableFileFormat {
    /// Inline format options, e.g. `TYPE = PARQUET`.
    Raw(String),
    /// Named file format object.
    Name(String),
}

impl ExternalTableFileFormat {
    fn render(&self) -> String {
        match self {
            ExternalTableFileFormat::Raw(raw) => format!("FILE_FORMAT = ({})", raw),
            ExternalTableFileFormat::Name(name) => {
                format!("FILE_FORMAT = (FORMAT_NAME = {})", quoted_literal(name))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Delta,
}

impl std::str::FromStr for TableFormat {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delta" => Ok(TableFormat::Delta),
            _ => Err(OptionsError::Invalid(format!(
                "invalid table format: {} (expected delta)",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateExternalTableOptions {
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub name: SchemaObjectIdentifier,
    pub columns: Vec<ExternalTableColumn>,
    pub partition_by: Vec<String>,
    pub location: String,
    pub refresh_on_create: Option<bool>,
    pub auto_refresh: Option<bool>,
    pub pattern: Option<String>,
    pub file_format: Option<ExternalTableFileFormat>,
    pub table_format: Option<TableFormat>,
    pub aws_sns_topic: Option<String>,
    pub copy_grants: bool,
    pub tags: Vec<TagAssociation>,
    pub comment: Option<String>,
}

impl SqlStatement for CreateExternalTableOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        if self.or_replace && self.if_not_exists {
            return Err(OptionsError::Conflict("or_replace", "if_not_exists"));
        }
        if self.location.is_empty() {
            return Err(OptionsError::Empty("location"));
        }
        match &self.file_format {
            None => return Err(OptionsError::Empty("file_format")),
            Some(ExternalTableFileFormat::Raw(s)) | Some(ExternalTableFileFormat::Name(s)) if s.is_empty() => {
                return Err(OptionsError::Empty("file_format"));
            }
            Some(_) => {}
        }
        if self.table_format == Some(TableFormat::Delta) {
            if self.pattern.is_some() {
                return Err(OptionsError::Conflict("table_format", "pattern"));
            }
            if self.aws_sns_topic.is_some() {
                return Err(OptionsError::Conflict("table_format", "aws_sns_topic"));
            }
        }
        for c in &self.columns {
            c.validate()?;
        }
        if self.partition_by.iter().any(String::is_empty) {
            return Err(OptionsError::Empty("partition_by column"));
        }
        validate_tags(&self.tags)
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("CREATE");
        buf.keyword_if(self.or_replace, "OR REPLACE")
            .push("EXTERNAL TABLE")
            .keyword_if(self.if_not_exists, "IF NOT EXISTS")
            .push(self.name.full_name());
        let columns: Vec<String> = self.columns.iter().map(ExternalTableColumn::render).collect();
        let partitions: Vec<String> = self.partition_by.iter().map(|p| quoted(p)).collect();
        buf.list("", &columns)
            .list("PARTITION BY", &partitions)
            .push(format!("WITH LOCATION = {}", self.location))
            .opt_bool("REFRESH_ON_CREATE", self.refresh_on_create)
            .opt_bool("AUTO_REFRESH", self.auto_refresh)
            .opt_string("PATTERN", self.pattern.as_deref());
        if let Some(ff) = &self.file_format {
            buf.push(ff.render());
        }
        if self.table_format == Some(TableFormat::Delta) {
            buf.push("TABLE_FORMAT = DELTA");
        }
        buf.opt_string("AWS_SNS_TOPIC", self.aws_sns_topic.as_deref())
            .keyword_if(self.copy_grants, "COPY GRANTS")
            .opt_string("COMMENT", self.comment.as_deref())
            .push(with_tag_clause(&self.tags));
        buf.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalTableRefresh {
    pub subpath: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AlterExternalTableOptions {
    pub if_exists: bool,
    pub name: SchemaObjectIdentifier,
    pub refresh: Option<ExternalTableRefresh>,
    pub add_files: Vec<String>,
    pub remove_files: Vec<String>,
    pub auto_refresh: Option<bool>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
}

impl SqlStatement for AlterExternalTableOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        exactly_one(
            &[
                self.refresh.is_some(),
                !self.add_files.is_empty(),
                !self.remove_files.is_empty(),
                self.auto_refresh.is_some(),
                !self.set_tag.is_empty(),
                !self.unset_tag.is_empty(),
            ],
            "refresh, add_files, remove_files, auto_refresh, set_tag, unset_tag",
        )?;
        validate_tags(&self.set_tag)?;
        validate_unset_tags(&self.unset_tag)
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("ALTER EXTERNAL TABLE");
        buf.keyword_if(self.if_exists, "IF EXISTS").push(self.name.full_name());
        if let Some(refresh) = &self.refresh {
            buf.push("REFRESH");
            if let Some(subpath) = &refresh.subpath {
                buf.push(quoted_literal(subpath));
            }
        }
        let files = |paths: &[String]| -> Vec<String> { paths.iter().map(|p| quoted_literal(p)).collect() };
        buf.list("ADD FILES", &files(&self.add_files))
            .list("REMOVE FILES", &files(&self.remove_files));
        if let Some(auto_refresh) = self.auto_refresh {
            buf.push(format!("SET AUTO_REFRESH = {}", bool_literal(auto_refresh)));
        }
        if !self.set_tag.is_empty() {
            buf.push(set_tag_clause(&self.set_tag));
        }
        if !self.unset_tag.is_empty() {
            buf.push(unset_tag_clause(&self.unset_tag));
        }
        buf.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DropExternalTableOptions {
    pub if_exists: bool,
    pub name: SchemaObjectIdentifier,
    pub cascade: bool,
    pub restrict: bool,
}

impl SqlStatement for DropExternalTableOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        if self.cascade && self.restrict {
            return Err(OptionsError::Conflict("cascade", "restrict"));
        }
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("DROP EXTERNAL TABLE");
        buf.keyword_if(self.if_exists, "IF EXISTS")
            .push(self.name.full_name())
            .keyword_if(self.cascade, "CASCADE")
            .keyword_if(self.restrict, "RESTRICT");
        buf.finish()
    }
}

#[derive(Clone, Debug)]
pub enum ExternalTableIn {
    Account,
    Database(AccountObjectIdentifier),
    Schema(DatabaseObjectIdentifier),
}

#[derive(Clone, Debug, Default)]
pub struct ShowExternalTableOptions {
    pub terse: bool,
    pub like: Option<String>,
    pub in_: Option<ExternalTableIn>,
}

impl SqlStatement for ShowExternalTableOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        match &self.in_ {
            Some(ExternalTableIn::Database(db)) => db.validate(),
            Some(ExternalTableIn::Schema(schema)) => schema.validate(),
            _ => Ok(()),
        }
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("SHOW");
        buf.keyword_if(self.terse, "TERSE").push("EXTERNAL TABLES");
        if let Some(like) = &self.like {
            buf.push(format!("LIKE {}", quoted_literal(like)));
        }
        match &self.in_ {
            Some(ExternalTableIn::Account) => {
                buf.push("IN ACCOUNT");
            }
            Some(ExternalTableIn::Database(db)) => {
                buf.push(format!("IN DATABASE {}", db.full_name()));
            }
            Some(ExternalTableIn::Schema(schema)) => {
                buf.push(format!("IN SCHEMA {}", schema.full_name()));
            }
            None => {}
        }
        buf.finish()
    }
}

pub struct ExternalTables<'a> {
    client: &'a Client,
}

impl<'a> ExternalTables<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        ExternalTables { client }
    }

    pub async fn list(
        &self,
        schema: &DatabaseObjectIdentifier,
        like: Option<&str>,
    ) -> Result<Vec<ExternalTable>, ProviderError> {
        schema.validate()?;
        self.show(&ShowExternalTableOptions {
            like: like.map(str::to_string),
            in_: Some(ExternalTableIn::Schema(schema.clone())),
            ..Default::default()
        })
        .await
    }

    pub async fn show(&self, options: &ShowExternalTableOptions) -> Result<Vec<ExternalTable>, ProviderError> {
        let sql = options.to_sql()?;
        let rows = self.client.query(&sql).await?;
        let rows: Vec<ExternalTableRow> = scan_all(rows)?;
        Ok(rows.into_iter().map(ExternalTable::from).collect())
    }

    /// Read one external table by exact name within its schema.
    pub async fn read(&self, id: &SchemaObjectIdentifier) -> Result<Option<ExternalTable>, ProviderError> {
        id.validate()?;
        let found = self
            .show(&ShowExternalTableOptions {
                like: Some(id.name().to_string()),
                in_: Some(ExternalTableIn::Schema(id.schema_id())),
                ..Default::default()
            })
            .await?;
        Ok(found.into_iter().find(|t| {
            t.name == id.name()
                && (t.database_name.is_empty() || t.database_name == id.database_name())
                && (t.schema_name.is_empty() || t.schema_name == id.schema_name())
        }))
    }

    pub async fn show_by_id(&self, id: &SchemaObjectIdentifier) -> Result<ExternalTable, ProviderError> {
        self.read(id)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("external table {}", id)))
    }

    /// Create, then read back the created table.
    pub async fn create(&self, options: &CreateExternalTableOptions) -> Result<ExternalTable, ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await?;
        self.show_by_id(&options.name).await
    }

    /// Create with `TABLE_FORMAT = DELTA`.
    pub async fn create_delta_lake(
        &self,
        options: &CreateExternalTableOptions,
    ) -> Result<ExternalTable, ProviderError> {
        let options = CreateExternalTableOptions {
            table_format: Some(TableFormat::Delta),
            ..options.clone()
        };
        self.create(&options).await
    }

    pub async fn alter(&self, options: &AlterExternalTableOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    /// Apply one alteration, then read the table back.
    pub async fn update(&self, options: &AlterExternalTableOptions) -> Result<ExternalTable, ProviderError> {
        self.alter(options).await?;
        self.show_by_id(&options.name).await
    }

    pub async fn drop(&self, options: &DropExternalTableOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    pub async fn delete(&self, id: &SchemaObjectIdentifier) -> Result<(), ProviderError> {
        self.drop(&DropExternalTableOptions {
            name: id.clone(),
            ..Default::default()
        })
        .await
    }
}
