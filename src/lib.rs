//! Snowflake provider: typed DDL builders, row mappers and resource adapters
//! for databases, schemas and external tables.

pub mod config;
pub mod error;
pub mod handlers;
pub mod provider;
pub mod resources;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use config::ProviderConfig;
pub use error::{ConfigError, OptionsError, ProviderError};
pub use provider::Provider;
pub use resources::{Resource, ResourceData, ResourceState};
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{common_routes, resource_routes, router};
pub use service::{Client, PgExecutor, SqlExecutor};
pub use state::AppState;
