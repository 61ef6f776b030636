//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use coinhist::GatewayConfig;
use dotenv::dotenv;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Connector configuration handed to every exchange.
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment (after reading `.env`).
    ///
    /// Optional:
    /// - `COINHIST_BIND`: listen address (default `0.0.0.0:8080`)
    /// - `QUANDL_API_KEY`: sent to Quandl as `api_key`
    /// - `COINHIST_REQUEST_TIMEOUT_SECS`: per-request upstream timeout
    /// - `COINHIST_GDAX_URL`, `COINHIST_KRAKEN_URL`, `COINHIST_BINANCE_URL`,
    ///   `COINHIST_QUANDL_URL`, `COINHIST_COINDESK_URL`: upstream base URLs
    ///
    /// # Errors
    /// Fails when a set variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    /// Fails when a set variable does not parse.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr = var("COINHIST_BIND")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("COINHIST_BIND must be a socket address such as 0.0.0.0:8080")?;

        let mut gateway = GatewayConfig {
            quandl_api_key: var("QUANDL_API_KEY"),
            ..GatewayConfig::default()
        };

        if let Some(secs) = var("COINHIST_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("COINHIST_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
            gateway.request_timeout = Some(Duration::from_secs(secs));
        }

        let endpoints = &mut gateway.endpoints;
        for (key, slot) in [
            ("COINHIST_GDAX_URL", &mut endpoints.gdax),
            ("COINHIST_KRAKEN_URL", &mut endpoints.kraken),
            ("COINHIST_BINANCE_URL", &mut endpoints.binance),
            ("COINHIST_QUANDL_URL", &mut endpoints.quandl),
            ("COINHIST_COINDESK_URL", &mut endpoints.coindesk),
        ] {
            if let Some(url) = var(key) {
                *slot = url;
            }
        }

        Ok(Self { bind_addr, gateway })
    }
}
