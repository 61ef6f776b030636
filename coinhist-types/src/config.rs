//! Configuration types passed explicitly to connectors and the gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URLs of the upstream APIs.
///
/// Each value is a scheme + host (optionally with a path prefix); connectors
/// append their own fixed resource path. Overriding these is how tests point
/// connectors at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeEndpoints {
    /// Coinbase Exchange (formerly GDAX) REST API.
    pub gdax: String,
    /// Kraken public REST API.
    pub kraken: String,
    /// Binance spot REST API.
    pub binance: String,
    /// Quandl dataset API serving the Bitfinex and Bitstamp daily series.
    pub quandl: String,
    /// CoinDesk Bitcoin Price Index API.
    pub coindesk: String,
}

impl Default for ExchangeEndpoints {
    fn default() -> Self {
        Self {
            gdax: "https://api.exchange.coinbase.com".to_string(),
            kraken: "https://api.kraken.com".to_string(),
            binance: "https://api.binance.com".to_string(),
            quandl: "https://www.quandl.com".to_string(),
            coindesk: "https://api.coindesk.com".to_string(),
        }
    }
}

impl ExchangeEndpoints {
    /// Point every exchange at the same base URL (used with a single mock server).
    #[must_use]
    pub fn all(base: &str) -> Self {
        Self {
            gdax: base.to_string(),
            kraken: base.to_string(),
            binance: base.to_string(),
            quandl: base.to_string(),
            coindesk: base.to_string(),
        }
    }
}

/// Gateway-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Upstream base URLs.
    pub endpoints: ExchangeEndpoints,
    /// Quandl API key; sent as `api_key` when present.
    pub quandl_api_key: Option<String>,
    /// Per-request timeout for outbound calls. `None` keeps the HTTP client default.
    pub request_timeout: Option<Duration>,
    /// User agent sent with every outbound request.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoints: ExchangeEndpoints::default(),
            quandl_api_key: None,
            request_timeout: None,
            user_agent: concat!("coinhist/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
