use std::sync::Arc;

use anyhow::Result;
use coinhist::Gateway;
use coinhist_exchanges::connectors_from_config;
use coinhist_server::{ServerConfig, app};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG=debug shows every upstream URL queried
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    fmt().with_env_filter(env_filter).with_target(false).init();

    let config = ServerConfig::from_env()?;

    let gateway = Gateway::builder()
        .with_connectors(connectors_from_config(&config.gateway)?)
        .build()?;
    info!(exchanges = ?gateway.exchange_names(), "registered exchanges");
    if config.gateway.quandl_api_key.is_none() {
        info!("QUANDL_API_KEY not set; bitfinex and bitstamp use anonymous Quandl access");
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app(Arc::new(gateway))).await?;

    Ok(())
}
