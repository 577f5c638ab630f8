//! Provider server: serves the resource lifecycle over HTTP.
//!
//! Run from repo root: `cargo run -p provider-server`

use snowflake_provider::{router, AppState, Client, Provider, ProviderConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("snowflake_provider=info")),
        )
        .init();

    let config = ProviderConfig::from_env()?;
    let client = Client::connect(&config).await?;
    let state = AppState::new(Provider::new(client));

    let app = router(state, config.body_limit);
    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Provider listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
