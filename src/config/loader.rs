//! Load provider settings from the environment (after `.env`, when present).

use crate::config::types::*;
use crate::error::ConfigError;
use std::str::FromStr;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS: &str = "PROVIDER_MAX_CONNECTIONS";
pub const LISTEN_ADDR: &str = "PROVIDER_LISTEN_ADDR";
pub const BODY_LIMIT: &str = "PROVIDER_BODY_LIMIT";

impl ProviderConfig {
    /// Read `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults; `DATABASE_URL` is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;
        let max_connections = parse_or(&lookup, MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_CONNECTIONS,
                value: "0".into(),
            });
        }
        let listen_addr = match lookup(LISTEN_ADDR) {
            Some(v) => parse_value(LISTEN_ADDR, &v)?,
            None => parse_value(LISTEN_ADDR, DEFAULT_LISTEN_ADDR)?,
        };
        let body_limit = parse_or(&lookup, BODY_LIMIT, DEFAULT_BODY_LIMIT)?;
        Ok(ProviderConfig {
            database_url,
            max_connections,
            listen_addr,
            body_limit,
        })
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(v) => parse_value(key, &v),
        None => Ok(default),
    }
}
