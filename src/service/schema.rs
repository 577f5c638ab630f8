//! Schemas: options, statement formatting, row mapping and service.

use crate::error::{OptionsError, ProviderError};
use crate::service::database::{push_retention_properties, DatabaseSet, DatabaseUnset};
use crate::service::Client;
use crate::sql::row::loose;
use crate::sql::tag::{set_tag_clause, unset_tag_clause, validate_tags, validate_unset_tags, with_tag_clause};
use crate::sql::{
    exactly_one, quoted_literal, scan_all, AccountObjectIdentifier, DatabaseObjectIdentifier,
    SchemaObjectIdentifier, SqlStatement, StatementBuf, TagAssociation,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Schema properties share the database property set.
pub type SchemaSet = DatabaseSet;
pub type SchemaUnset = DatabaseUnset;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    pub created_on: DateTime<Utc>,
    pub name: String,
    pub is_default: bool,
    pub is_current: bool,
    pub database_name: String,
    pub owner: String,
    pub comment: String,
    pub options: String,
    pub retention_time: i64,
    pub owner_role_type: String,
}

impl Schema {
    pub fn id(&self) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(self.database_name.clone(), self.name.clone())
    }

    pub fn is_transient(&self) -> bool {
        self.options.to_uppercase().contains("TRANSIENT")
    }

    pub fn is_managed_access(&self) -> bool {
        self.options.to_uppercase().contains("MANAGED ACCESS")
    }
}

#[derive(Deserialize)]
struct SchemaRow {
    #[serde(default, deserialize_with = "loose::timestamp")]
    created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    is_default: Option<bool>,
    #[serde(default, deserialize_with = "loose::boolean")]
    is_current: Option<bool>,
    #[serde(default, deserialize_with = "loose::string")]
    database_name: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    owner: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    comment: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    options: Option<String>,
    #[serde(default, deserialize_with = "loose::int")]
    retention_time: Option<i64>,
    #[serde(default, deserialize_with = "loose::string")]
    owner_role_type: Option<String>,
}

impl From<SchemaRow> for Schema {
    fn from(r: SchemaRow) -> Self {
        Schema {
            created_on: r.created_on.unwrap_or_default(),
            name: r.name.unwrap_or_default(),
            is_default: r.is_default.unwrap_or_default(),
            is_current: r.is_current.unwrap_or_default(),
            database_name: r.database_name.unwrap_or_default(),
            owner: r.owner.unwrap_or_default(),
            comment: r.comment.unwrap_or_default(),
            options: r.options.unwrap_or_default(),
            retention_time: r.retention_time.unwrap_or_default(),
            owner_role_type: r.owner_role_type.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateSchemaOptions {
    pub or_replace: bool,
    pub transient: bool,
    pub if_not_exists: bool,
    pub name: DatabaseObjectIdentifier,
    pub with_managed_access: bool,
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub tags: Vec<TagAssociation>,
    pub comment: Option<String>,
}

impl SqlStatement for CreateSchemaOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        if self.or_replace && self.if_not_exists {
            return Err(OptionsError::Conflict("or_replace", "if_not_exists"));
        }
        validate_tags(&self.tags)
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("CREATE");
        buf.keyword_if(self.or_replace, "OR REPLACE")
            .keyword_if(self.transient, "TRANSIENT")
            .push("SCHEMA")
            .keyword_if(self.if_not_exists, "IF NOT EXISTS")
            .push(self.name.full_name())
            .keyword_if(self.with_managed_access, "WITH MANAGED ACCESS");
        push_retention_properties(
            &mut buf,
            self.data_retention_time_in_days,
            self.max_data_extension_time_in_days,
            self.default_ddl_collation.as_deref(),
        );
        buf.push(with_tag_clause(&self.tags))
            .opt_string("COMMENT", self.comment.as_deref());
        buf.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlterSchemaOptions {
    pub if_exists: bool,
    pub name: DatabaseObjectIdentifier,
    pub new_name: Option<DatabaseObjectIdentifier>,
    pub set: Option<SchemaSet>,
    pub unset: Option<SchemaUnset>,
    pub set_tag: Vec<TagAssociation>,
    pub unset_tag: Vec<SchemaObjectIdentifier>,
    pub enable_managed_access: bool,
    pub disable_managed_access: bool,
}

impl SqlStatement for AlterSchemaOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        exactly_one(
            &[
                self.new_name.is_some(),
                self.set.is_some(),
                self.unset.is_some(),
                !self.set_tag.is_empty(),
                !self.unset_tag.is_empty(),
                self.enable_managed_access,
                self.disable_managed_access,
            ],
            "new_name, set, unset, set_tag, unset_tag, enable_managed_access, disable_managed_access",
        )?;
        if let Some(new_name) = &self.new_name {
            new_name.validate()?;
            if new_name.database_name() != self.name.database_name() {
                return Err(OptionsError::Invalid(
                    "new_name must be in the same database".into(),
                ));
            }
        }
        if self.set.as_ref().is_some_and(SchemaSet::is_empty)
            || self.unset.as_ref().is_some_and(|u| u.names().is_empty())
        {
            return Err(OptionsError::AtLeastOneOf(
                "data_retention_time_in_days, max_data_extension_time_in_days, default_ddl_collation, comment",
            ));
        }
        validate_tags(&self.set_tag)?;
        validate_unset_tags(&self.unset_tag)
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("ALTER SCHEMA");
        buf.keyword_if(self.if_exists, "IF EXISTS").push(self.name.full_name());
        if let Some(new_name) = &self.new_name {
            buf.push(format!("RENAME TO {}", new_name.full_name()));
        }
        if let Some(set) = &self.set {
            buf.push("SET");
            push_retention_properties(
                &mut buf,
                set.data_retention_time_in_days,
                set.max_data_extension_time_in_days,
                set.default_ddl_collation.as_deref(),
            );
            buf.opt_string("COMMENT", set.comment.as_deref());
        }
        if let Some(unset) = &self.unset {
            buf.push(format!("UNSET {}", unset.names().join(", ")));
        }
        if !self.set_tag.is_empty() {
            buf.push(set_tag_clause(&self.set_tag));
        }
        if !self.unset_tag.is_empty() {
            buf.push(unset_tag_clause(&self.unset_tag));
        }
        buf.keyword_if(self.enable_managed_access, "ENABLE MANAGED ACCESS")
            .keyword_if(self.disable_managed_access, "DISABLE MANAGED ACCESS");
        buf.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DropSchemaOptions {
    pub if_exists: bool,
    pub name: DatabaseObjectIdentifier,
    pub cascade: bool,
    pub restrict: bool,
}

impl SqlStatement for DropSchemaOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        if self.cascade && self.restrict {
            return Err(OptionsError::Conflict("cascade", "restrict"));
        }
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("DROP SCHEMA");
        buf.keyword_if(self.if_exists, "IF EXISTS")
            .push(self.name.full_name())
            .keyword_if(self.cascade, "CASCADE")
            .keyword_if(self.restrict, "RESTRICT");
        buf.finish()
    }
}

#[derive(Clone, Debug)]
pub enum SchemaIn {
    Account,
    Database(AccountObjectIdentifier),
}

#[derive(Clone, Debug, Default)]
pub struct ShowSchemaOptions {
    pub terse: bool,
    pub history: bool,
    pub like: Option<String>,
    pub in_: Option<SchemaIn>,
}

impl SqlStatement for ShowSchemaOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        if let Some(SchemaIn::Database(db)) = &self.in_ {
            db.validate()?;
        }
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("SHOW");
        buf.keyword_if(self.terse, "TERSE")
            .push("SCHEMAS")
            .keyword_if(self.history, "HISTORY");
        if let Some(like) = &self.like {
            buf.push(format!("LIKE {}", quoted_literal(like)));
        }
        match &self.in_ {
            Some(SchemaIn::Account) => {
                buf.push("IN ACCOUNT");
            }
            Some(SchemaIn::Database(db)) => {
                buf.push(format!("IN DATABASE {}", db.full_name()));
            }
            None => {}
        }
        buf.finish()
    }
}

pub struct Schemas<'a> {
    client: &'a Client,
}

impl<'a> Schemas<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Schemas { client }
    }

    /// List schemas of one database, optionally filtered by a `LIKE` pattern.
    pub async fn list(
        &self,
        database: &AccountObjectIdentifier,
        like: Option<&str>,
    ) -> Result<Vec<Schema>, ProviderError> {
        database.validate()?;
        self.show(&ShowSchemaOptions {
            like: like.map(str::to_string),
            in_: Some(SchemaIn::Database(database.clone())),
            ..Default::default()
        })
        .await
    }

    pub async fn show(&self, options: &ShowSchemaOptions) -> Result<Vec<Schema>, ProviderError> {
        let sql = options.to_sql()?;
        let rows = self.client.query(&sql).await?;
        let rows: Vec<SchemaRow> = scan_all(rows)?;
        Ok(rows.into_iter().map(Schema::from).collect())
    }

    /// Read one schema by exact name within its database.
    pub async fn read(&self, id: &DatabaseObjectIdentifier) -> Result<Option<Schema>, ProviderError> {
        id.validate()?;
        let found = self
            .show(&ShowSchemaOptions {
                like: Some(id.name().to_string()),
                in_: Some(SchemaIn::Database(id.database_id())),
                ..Default::default()
            })
            .await?;
        Ok(found
            .into_iter()
            .find(|s| s.name == id.name() && (s.database_name.is_empty() || s.database_name == id.database_name())))
    }

    pub async fn show_by_id(&self, id: &DatabaseObjectIdentifier) -> Result<Schema, ProviderError> {
        self.read(id)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("schema {}", id)))
    }

    /// Create, then read back the created schema.
    pub async fn create(&self, options: &CreateSchemaOptions) -> Result<Schema, ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await?;
        self.show_by_id(&options.name).await
    }

    pub async fn alter(&self, options: &AlterSchemaOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    /// Set properties on an existing schema, then read it back.
    pub async fn update(&self, id: &DatabaseObjectIdentifier, set: SchemaSet) -> Result<Schema, ProviderError> {
        self.alter(&AlterSchemaOptions {
            name: id.clone(),
            set: Some(set),
            ..Default::default()
        })
        .await?;
        self.show_by_id(id).await
    }

    pub async fn drop(&self, options: &DropSchemaOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    pub async fn delete(&self, id: &DatabaseObjectIdentifier) -> Result<(), ProviderError> {
        self.drop(&DropSchemaOptions {
            name: id.clone(),
            ..Default::default()
        })
        .await
    }
}
