//! CoinDesk Bitcoin Price Index, routed as the `index` exchange.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinhist_core::{
    CoinhistError, ExchangeConnector, GatewayConfig, Granularity, IntervalToken, PricePoint,
    decimal_from_json, decode_json, newest_first, parse_day,
};
use serde::Deserialize;
use serde_json::Value;

use crate::adapter::{HttpTransport, endpoint, fetch_ok, validate_base};

const NAME: &str = "index";

/// Bucket width per supported token.
pub const GRANULARITIES: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
];

#[derive(Debug, Deserialize)]
struct BpiBody {
    bpi: BTreeMap<String, Value>,
}

/// Connector for `/v1/bpi/historical/open.json`.
pub struct CoindeskConnector {
    transport: Arc<dyn HttpTransport>,
    base: String,
}

impl CoindeskConnector {
    /// Build against `base`, e.g. `https://api.coindesk.com`.
    ///
    /// # Errors
    /// `InvalidArg` if `base` is not a URL.
    pub fn new(transport: Arc<dyn HttpTransport>, base: &str) -> Result<Self, CoinhistError> {
        Ok(Self {
            transport,
            base: validate_base(NAME, base)?,
        })
    }

    /// Build from the gateway configuration.
    ///
    /// # Errors
    /// `InvalidArg` if the configured base URL is not a URL.
    pub fn from_config(
        transport: Arc<dyn HttpTransport>,
        cfg: &GatewayConfig,
    ) -> Result<Self, CoinhistError> {
        Self::new(transport, &cfg.endpoints.coindesk)
    }
}

/// Decode a BPI body (date → price map) into price points, newest first.
///
/// # Errors
/// `Decode` for malformed JSON, a bad date key, or a non-numeric price.
pub fn decode_buckets(body: &[u8]) -> Result<Vec<PricePoint>, CoinhistError> {
    let parsed: BpiBody = decode_json(NAME, body)?;
    let mut out = parsed
        .bpi
        .iter()
        .map(|(day, v)| {
            let ts = parse_day(day)
                .ok_or_else(|| CoinhistError::decode(NAME, format!("bad date key {day:?}")))?;
            let price = decimal_from_json(v).ok_or_else(|| {
                CoinhistError::decode(NAME, format!("{day}: price is not a number"))
            })?;
            Ok(PricePoint::new(ts, price))
        })
        .collect::<Result<Vec<_>, CoinhistError>>()?;
    newest_first(&mut out);
    Ok(out)
}

fn error_message(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl ExchangeConnector for CoindeskConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "CoinDesk"
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        GRANULARITIES
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist_exchanges::coindesk::history", skip(self))
    )]
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let plan = self.resolve(token, now)?;
        let url = endpoint(
            NAME,
            &self.base,
            "v1/bpi/historical/open.json",
            &[
                ("start", plan.start().format("%Y-%m-%d").to_string()),
                ("end", plan.end().format("%Y-%m-%d").to_string()),
            ],
        )?;
        let body = fetch_ok(self.transport.as_ref(), NAME, url, error_message).await?;
        decode_buckets(&body)
    }
}
