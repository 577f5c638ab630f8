//! Databases: options, statement formatting, row mapping and service.

use crate::error::{OptionsError, ProviderError};
use crate::service::Client;
use crate::sql::row::loose;
use crate::sql::{scan_all, AccountObjectIdentifier, SqlStatement, StatementBuf, exactly_one, quoted_literal};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Snowflake database as reported by `SHOW DATABASES`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Database {
    pub name: String,
    pub is_default: bool,
    pub is_current: bool,
    pub origin: String,
    pub owner: String,
    pub comment: String,
    pub options: String,
    pub retention_time: i64,
    pub created_on: DateTime<Utc>,
}

impl Database {
    pub fn id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(self.name.clone())
    }

    pub fn is_transient(&self) -> bool {
        self.options.to_uppercase().contains("TRANSIENT")
    }
}

#[derive(Deserialize)]
struct DatabaseRow {
    #[serde(default, deserialize_with = "loose::string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean")]
    is_default: Option<bool>,
    #[serde(default, deserialize_with = "loose::boolean")]
    is_current: Option<bool>,
    #[serde(default, deserialize_with = "loose::string")]
    origin: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    owner: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    comment: Option<String>,
    #[serde(default, deserialize_with = "loose::string")]
    options: Option<String>,
    #[serde(default, deserialize_with = "loose::int")]
    retention_time: Option<i64>,
    #[serde(default, deserialize_with = "loose::timestamp")]
    created_on: Option<DateTime<Utc>>,
}

impl From<DatabaseRow> for Database {
    fn from(r: DatabaseRow) -> Self {
        Database {
            name: r.name.unwrap_or_default(),
            is_default: r.is_default.unwrap_or_default(),
            is_current: r.is_current.unwrap_or_default(),
            origin: r.origin.unwrap_or_default(),
            owner: r.owner.unwrap_or_default(),
            comment: r.comment.unwrap_or_default(),
            options: r.options.unwrap_or_default(),
            retention_time: r.retention_time.unwrap_or_default(),
            created_on: r.created_on.unwrap_or_default(),
        }
    }
}

/// Shared property clauses for databases and schemas, in their fixed order.
pub(crate) fn push_retention_properties(
    buf: &mut StatementBuf,
    data_retention_time_in_days: Option<u32>,
    max_data_extension_time_in_days: Option<u32>,
    default_ddl_collation: Option<&str>,
) {
    buf.opt_param("DATA_RETENTION_TIME_IN_DAYS", data_retention_time_in_days)
        .opt_param("MAX_DATA_EXTENSION_TIME_IN_DAYS", max_data_extension_time_in_days)
        .opt_string("DEFAULT_DDL_COLLATION", default_ddl_collation);
}

#[derive(Clone, Debug, Default)]
pub struct CreateDatabaseOptions {
    pub or_replace: bool,
    pub transient: bool,
    pub if_not_exists: bool,
    pub name: AccountObjectIdentifier,
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub comment: Option<String>,
}

impl SqlStatement for CreateDatabaseOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        if self.or_replace && self.if_not_exists {
            return Err(OptionsError::Conflict("or_replace", "if_not_exists"));
        }
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("CREATE");
        buf.keyword_if(self.or_replace, "OR REPLACE")
            .keyword_if(self.transient, "TRANSIENT")
            .push("DATABASE")
            .keyword_if(self.if_not_exists, "IF NOT EXISTS")
            .push(self.name.full_name());
        push_retention_properties(
            &mut buf,
            self.data_retention_time_in_days,
            self.max_data_extension_time_in_days,
            self.default_ddl_collation.as_deref(),
        );
        buf.opt_string("COMMENT", self.comment.as_deref());
        buf.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatabaseSet {
    pub data_retention_time_in_days: Option<u32>,
    pub max_data_extension_time_in_days: Option<u32>,
    pub default_ddl_collation: Option<String>,
    pub comment: Option<String>,
}

impl DatabaseSet {
    pub(crate) fn is_empty(&self) -> bool {
        self.data_retention_time_in_days.is_none()
            && self.max_data_extension_time_in_days.is_none()
            && self.default_ddl_collation.is_none()
            && self.comment.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatabaseUnset {
    pub data_retention_time_in_days: bool,
    pub max_data_extension_time_in_days: bool,
    pub default_ddl_collation: bool,
    pub comment: bool,
}

impl DatabaseUnset {
    pub(crate) fn names(&self) -> Vec<String> {
        [
            (self.data_retention_time_in_days, "DATA_RETENTION_TIME_IN_DAYS"),
            (self.max_data_extension_time_in_days, "MAX_DATA_EXTENSION_TIME_IN_DAYS"),
            (self.default_ddl_collation, "DEFAULT_DDL_COLLATION"),
            (self.comment, "COMMENT"),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, n)| n.to_string())
        .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlterDatabaseOptions {
    pub if_exists: bool,
    pub name: AccountObjectIdentifier,
    pub new_name: Option<AccountObjectIdentifier>,
    pub set: Option<DatabaseSet>,
    pub unset: Option<DatabaseUnset>,
}

impl SqlStatement for AlterDatabaseOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()?;
        exactly_one(
            &[self.new_name.is_some(), self.set.is_some(), self.unset.is_some()],
            "new_name, set, unset",
        )?;
        if let Some(new_name) = &self.new_name {
            new_name.validate()?;
        }
        if self.set.as_ref().is_some_and(DatabaseSet::is_empty) {
            return Err(OptionsError::AtLeastOneOf(
                "data_retention_time_in_days, max_data_extension_time_in_days, default_ddl_collation, comment",
            ));
        }
        if self.unset.as_ref().is_some_and(|u| u.names().is_empty()) {
            return Err(OptionsError::AtLeastOneOf(
                "data_retention_time_in_days, max_data_extension_time_in_days, default_ddl_collation, comment",
            ));
        }
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("ALTER DATABASE");
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
        buf.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DropDatabaseOptions {
    pub if_exists: bool,
    pub name: AccountObjectIdentifier,
}

impl SqlStatement for DropDatabaseOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        self.name.validate()
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("DROP DATABASE");
        buf.keyword_if(self.if_exists, "IF EXISTS").push(self.name.full_name());
        buf.finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShowDatabaseOptions {
    pub terse: bool,
    pub like: Option<String>,
}

impl SqlStatement for ShowDatabaseOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        Ok(())
    }

    fn build(&self) -> String {
        let mut buf = StatementBuf::new("SHOW");
        buf.keyword_if(self.terse, "TERSE").push("DATABASES");
        if let Some(like) = &self.like {
            buf.push(format!("LIKE {}", quoted_literal(like)));
        }
        buf.finish()
    }
}

/// Listing by pattern; the pattern is required.
#[derive(Clone, Debug, Default)]
pub struct DatabaseListOptions {
    pub pattern: String,
}

impl DatabaseListOptions {
    fn validate(&self) -> Result<(), OptionsError> {
        if self.pattern.is_empty() {
            return Err(OptionsError::Empty("pattern"));
        }
        Ok(())
    }
}

pub struct Databases<'a> {
    client: &'a Client,
}

impl<'a> Databases<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Databases { client }
    }

    /// List databases whose name matches `options.pattern`.
    pub async fn list(&self, options: &DatabaseListOptions) -> Result<Vec<Database>, ProviderError> {
        options.validate()?;
        self.show(&ShowDatabaseOptions {
            like: Some(options.pattern.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn show(&self, options: &ShowDatabaseOptions) -> Result<Vec<Database>, ProviderError> {
        let sql = options.to_sql()?;
        let rows = self.client.query(&sql).await?;
        let rows: Vec<DatabaseRow> = scan_all(rows)?;
        Ok(rows.into_iter().map(Database::from).collect())
    }

    /// Read one database by exact name. `None` when it does not exist.
    pub async fn read(&self, id: &AccountObjectIdentifier) -> Result<Option<Database>, ProviderError> {
        id.validate()?;
        let found = self
            .show(&ShowDatabaseOptions {
                like: Some(id.name().to_string()),
                ..Default::default()
            })
            .await?;
        Ok(found.into_iter().find(|d| d.name == id.name()))
    }

    pub async fn show_by_id(&self, id: &AccountObjectIdentifier) -> Result<Database, ProviderError> {
        self.read(id)
            .await?
            .ok_or_else(|| ProviderError::NotFound(format!("database {}", id)))
    }

    /// Create, then read back the created database.
    pub async fn create(&self, options: &CreateDatabaseOptions) -> Result<Database, ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await?;
        self.show_by_id(&options.name).await
    }

    pub async fn alter(&self, options: &AlterDatabaseOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    /// Set properties on an existing database, then read it back.
    pub async fn update(&self, id: &AccountObjectIdentifier, set: DatabaseSet) -> Result<Database, ProviderError> {
        self.alter(&AlterDatabaseOptions {
            name: id.clone(),
            set: Some(set),
            ..Default::default()
        })
        .await?;
        self.show_by_id(id).await
    }

    pub async fn drop(&self, options: &DropDatabaseOptions) -> Result<(), ProviderError> {
        let sql = options.to_sql()?;
        self.client.exec(&sql).await
    }

    pub async fn delete(&self, id: &AccountObjectIdentifier) -> Result<(), ProviderError> {
        self.drop(&DropDatabaseOptions {
            name: id.clone(),
            ..Default::default()
        })
        .await
    }
}
