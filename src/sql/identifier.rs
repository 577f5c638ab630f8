//! Hierarchical object identifiers and their string-encoded resource ids.

use crate::error::{OptionsError, ProviderError};
use crate::sql::builder::quoted;
use std::fmt;

const ID_DELIMITER: char = '|';

fn decode_parts<const N: usize>(id: &str) -> Result<[String; N], ProviderError> {
    let parts: Vec<String> = id.split(ID_DELIMITER).map(|p| p.trim_matches('"').to_string()).collect();
    if parts.len() != N || parts.iter().any(String::is_empty) {
        return Err(ProviderError::InvalidId(format!(
            "'{}' (expected {} parts separated by '{}')",
            id, N, ID_DELIMITER
        )));
    }
    parts
        .try_into()
        .map_err(|_| ProviderError::InvalidId(id.to_string()))
}

/// Top-level object (database, warehouse, role).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AccountObjectIdentifier {
    name: String,
}

impl AccountObjectIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        AccountObjectIdentifier { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        quoted(&self.name)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.name.is_empty() {
            return Err(OptionsError::Empty("name"));
        }
        Ok(())
    }

    pub fn resource_id(&self) -> String {
        self.name.clone()
    }

    pub fn from_resource_id(id: &str) -> Result<Self, ProviderError> {
        let [name] = decode_parts::<1>(id)?;
        Ok(Self::new(name))
    }
}

/// Object living in a database (schema).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DatabaseObjectIdentifier {
    database: String,
    name: String,
}

impl DatabaseObjectIdentifier {
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        DatabaseObjectIdentifier {
            database: database.into(),
            name: name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_id(&self) -> AccountObjectIdentifier {
        AccountObjectIdentifier::new(self.database.clone())
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", quoted(&self.database), quoted(&self.name))
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.database.is_empty() {
            return Err(OptionsError::Empty("database name"));
        }
        if self.name.is_empty() {
            return Err(OptionsError::Empty("name"));
        }
        Ok(())
    }

    pub fn resource_id(&self) -> String {
        format!("{}{}{}", self.database, ID_DELIMITER, self.name)
    }

    pub fn from_resource_id(id: &str) -> Result<Self, ProviderError> {
        let [database, name] = decode_parts::<2>(id)?;
        Ok(Self::new(database, name))
    }
}

/// Object living in a schema (table, external table, tag).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SchemaObjectIdentifier {
    database: String,
    schema: String,
    name: String,
}

impl SchemaObjectIdentifier {
    pub fn new(database: impl Into<String>, schema: impl Into<String>, name: impl Into<String>) -> Self {
        SchemaObjectIdentifier {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_id(&self) -> DatabaseObjectIdentifier {
        DatabaseObjectIdentifier::new(self.database.clone(), self.schema.clone())
    }

    pub fn full_name(&self) -> String {
        format!(
            "{}.{}.{}",
            quoted(&self.database),
            quoted(&self.schema),
            quoted(&self.name)
        )
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.database.is_empty() {
            return Err(OptionsError::Empty("database name"));
        }
        if self.schema.is_empty() {
            return Err(OptionsError::Empty("schema name"));
        }
        if self.name.is_empty() {
            return Err(OptionsError::Empty("name"));
        }
        Ok(())
    }

    pub fn resource_id(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.database,
            self.schema,
            self.name,
            d = ID_DELIMITER
        )
    }

    pub fn from_resource_id(id: &str) -> Result<Self, ProviderError> {
        let [database, schema, name] = decode_parts::<3>(id)?;
        Ok(Self::new(database, schema, name))
    }
}

impl fmt::Display for AccountObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl fmt::Display for DatabaseObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl fmt::Display for SchemaObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
