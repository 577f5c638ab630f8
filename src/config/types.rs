//! Provider settings.

use std::net::SocketAddr;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Connection and serving settings for one provider instance.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Connection string for the warehouse endpoint.
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: SocketAddr,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}
