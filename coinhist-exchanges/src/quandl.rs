//! Daily Bitfinex and Bitstamp series served by the Quandl dataset API.
//!
//! Both exchanges share one request shape; they differ only in the dataset
//! code and which column carries the price.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinhist_core::{
    BucketReader, CoinhistError, ExchangeConnector, GatewayConfig, Granularity, IntervalToken,
    PricePoint, decode_json, newest_first,
};
use serde::Deserialize;
use serde_json::Value;

use crate::adapter::{HttpTransport, endpoint, fetch_ok, validate_base};

/// Bucket width per supported token.
pub const GRANULARITIES: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
];

/// One Quandl dataset exposed as an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuandlDataset {
    /// Exchange name the dataset is routed under.
    pub exchange: &'static str,
    /// Dataset code, `DATABASE/DATASET`.
    pub code: &'static str,
    /// Index of the price column within each row.
    pub price_idx: usize,
}

impl QuandlDataset {
    /// `BITFINEX/BTCUSD`: `[date, high, low, mid, last, bid, ask, volume]`, priced at mid.
    pub const BITFINEX: Self = Self {
        exchange: "bitfinex",
        code: "BITFINEX/BTCUSD",
        price_idx: 3,
    };

    /// `BITSTAMP/USD`: `[date, high, low, last, bid, ask, volume, vwap]`, priced at VWAP.
    pub const BITSTAMP: Self = Self {
        exchange: "bitstamp",
        code: "BITSTAMP/USD",
        price_idx: 7,
    };
}

#[derive(Debug, Deserialize)]
struct DatasetBody {
    dataset: Dataset,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    data: Vec<Value>,
}

/// Connector for one Quandl dataset.
pub struct QuandlConnector {
    dataset: QuandlDataset,
    transport: Arc<dyn HttpTransport>,
    base: String,
    api_key: Option<String>,
}

impl QuandlConnector {
    /// Build for `dataset` against `base`, e.g. `https://www.quandl.com`.
    ///
    /// # Errors
    /// `InvalidArg` if `base` is not a URL.
    pub fn new(
        dataset: QuandlDataset,
        transport: Arc<dyn HttpTransport>,
        base: &str,
        api_key: Option<String>,
    ) -> Result<Self, CoinhistError> {
        Ok(Self {
            dataset,
            transport,
            base: validate_base(dataset.exchange, base)?,
            api_key,
        })
    }

    /// Build from the gateway configuration.
    ///
    /// # Errors
    /// `InvalidArg` if the configured base URL is not a URL.
    pub fn from_config(
        dataset: QuandlDataset,
        transport: Arc<dyn HttpTransport>,
        cfg: &GatewayConfig,
    ) -> Result<Self, CoinhistError> {
        Self::new(
            dataset,
            transport,
            &cfg.endpoints.quandl,
            cfg.quandl_api_key.clone(),
        )
    }
}

/// Decode a dataset body into price points, newest first.
///
/// # Errors
/// `Decode` for malformed JSON, bad dates, or a missing or null price.
pub fn decode_buckets(
    dataset: QuandlDataset,
    body: &[u8],
) -> Result<Vec<PricePoint>, CoinhistError> {
    let parsed: DatasetBody = decode_json(dataset.exchange, body)?;
    let mut out = parsed
        .dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let r = BucketReader::new(dataset.exchange, i, row)?;
            Ok(PricePoint::new(r.day_at(0)?, r.decimal_at(dataset.price_idx)?))
        })
        .collect::<Result<Vec<_>, CoinhistError>>()?;
    newest_first(&mut out);
    Ok(out)
}

fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        quandl_error: QuandlError,
    }
    #[derive(Deserialize)]
    struct QuandlError {
        message: String,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|e| e.quandl_error.message)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl ExchangeConnector for QuandlConnector {
    fn name(&self) -> &'static str {
        self.dataset.exchange
    }

    fn vendor(&self) -> &'static str {
        "Quandl"
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        GRANULARITIES
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist_exchanges::quandl::history", skip(self))
    )]
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let plan = self.resolve(token, now)?;
        let mut query = Vec::with_capacity(2);
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }
        query.push(("start_date", plan.start().format("%Y-%m-%d").to_string()));
        let url = endpoint(
            self.dataset.exchange,
            &self.base,
            &format!("api/v3/datasets/{}.json", self.dataset.code),
            &query,
        )?;
        let body = fetch_ok(
            self.transport.as_ref(),
            self.dataset.exchange,
            url,
            error_message,
        )
        .await?;
        decode_buckets(self.dataset, &body)
    }
}
