//! coinhist-exchanges
//!
//! One `ExchangeConnector` per upstream BTC/USD source. Every connector builds
//! its own request shape, fetches through a shared `HttpTransport`, and
//! hand-decodes the exchange's positional rows into `PricePoint`s.
//!
//! | exchange   | upstream                          | price  |
//! |------------|-----------------------------------|--------|
//! | `gdax`     | Coinbase Exchange candles         | open   |
//! | `kraken`   | Kraken OHLC                       | open   |
//! | `binance`  | Binance klines                    | open   |
//! | `bitfinex` | Quandl `BITFINEX/BTCUSD`          | mid    |
//! | `bitstamp` | Quandl `BITSTAMP/USD`             | VWAP   |
//! | `index`    | CoinDesk Bitcoin Price Index      | open   |
#![warn(missing_docs)]

/// Outbound HTTP transport and the production `reqwest` adapter.
pub mod adapter;
/// Binance klines.
pub mod binance;
/// CoinDesk BPI.
pub mod coindesk;
/// Coinbase Exchange candles.
pub mod gdax;
/// Kraken OHLC.
pub mod kraken;
/// Quandl daily datasets for Bitfinex and Bitstamp.
pub mod quandl;

use std::sync::Arc;

use coinhist_core::{CoinhistError, ExchangeConnector, GatewayConfig};

pub use adapter::{HttpTransport, RawResponse, ReqwestTransport};
pub use binance::BinanceConnector;
pub use coindesk::CoindeskConnector;
pub use gdax::GdaxConnector;
pub use kraken::KrakenConnector;
pub use quandl::{QuandlConnector, QuandlDataset};

/// Every built-in connector, sharing one `reqwest` client built from `cfg`.
///
/// # Errors
/// `InvalidArg` if the HTTP client cannot be built or a base URL is invalid.
pub fn connectors_from_config(
    cfg: &GatewayConfig,
) -> Result<Vec<Arc<dyn ExchangeConnector>>, CoinhistError> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::from_config(cfg)?);
    connectors_with_transport(&transport, cfg)
}

/// Every built-in connector over an explicit transport.
///
/// # Errors
/// `InvalidArg` if a configured base URL is invalid.
pub fn connectors_with_transport(
    transport: &Arc<dyn HttpTransport>,
    cfg: &GatewayConfig,
) -> Result<Vec<Arc<dyn ExchangeConnector>>, CoinhistError> {
    let all: Vec<Arc<dyn ExchangeConnector>> = vec![
        Arc::new(GdaxConnector::from_config(Arc::clone(transport), cfg)?),
        Arc::new(KrakenConnector::from_config(Arc::clone(transport), cfg)?),
        Arc::new(QuandlConnector::from_config(
            QuandlDataset::BITFINEX,
            Arc::clone(transport),
            cfg,
        )?),
        Arc::new(CoindeskConnector::from_config(Arc::clone(transport), cfg)?),
        Arc::new(BinanceConnector::from_config(Arc::clone(transport), cfg)?),
        Arc::new(QuandlConnector::from_config(
            QuandlDataset::BITSTAMP,
            Arc::clone(transport),
            cfg,
        )?),
    ];
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_six_uniquely_named_exchanges() {
        let cfg = GatewayConfig::default();
        let transport = <dyn HttpTransport>::from_fn(|_| panic!("no request expected"));
        let all = connectors_with_transport(&transport, &cfg).unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["gdax", "kraken", "bitfinex", "index", "binance", "bitstamp"]
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut cfg = GatewayConfig::default();
        cfg.endpoints.kraken = "::nope".into();
        let err = connectors_from_config(&cfg).err().unwrap();
        assert!(matches!(err, CoinhistError::InvalidArg(_)));
    }
}
