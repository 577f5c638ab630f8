//! Entity services over one shared executor.

pub mod database;
mod executor;
pub mod external_table;
pub mod schema;

pub use database::{Database, Databases};
pub use executor::{PgExecutor, SqlExecutor};
pub use external_table::{ExternalTable, ExternalTables};
pub use schema::{Schema, Schemas};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::sql::Row;
use std::sync::Arc;

/// Handle shared by all services of one provider instance. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    executor: Arc<dyn SqlExecutor>,
}

impl Client {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Client { executor }
    }

    /// Open the pool described by `config` and wrap it in a [`PgExecutor`].
    pub async fn connect(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(ProviderError::Exec)?;
        Ok(Client::new(Arc::new(PgExecutor::new(pool))))
    }

    pub fn databases(&self) -> Databases<'_> {
        Databases::new(self)
    }

    pub fn schemas(&self) -> Schemas<'_> {
        Schemas::new(self)
    }

    pub fn external_tables(&self) -> ExternalTables<'_> {
        ExternalTables::new(self)
    }

    /// Round-trip a trivial query; used by readiness checks.
    pub async fn ping(&self) -> Result<(), ProviderError> {
        self.query("SELECT 1").await.map(|_| ())
    }

    pub(crate) async fn exec(&self, sql: &str) -> Result<(), ProviderError> {
        tracing::debug!(sql = %sql, "exec");
        self.executor.exec(sql).await.map_err(ProviderError::Exec)?;
        Ok(())
    }

    pub(crate) async fn query(&self, sql: &str) -> Result<Vec<Row>, ProviderError> {
        tracing::debug!(sql = %sql, "query");
        self.executor.query(sql).await.map_err(ProviderError::Query)
    }
}
