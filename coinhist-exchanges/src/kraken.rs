//! Kraken public OHLC.
//!
//! Kraken wraps every answer in `{"error": [...], "result": {...}}` and may
//! report failures with a 200 status, so the envelope is checked on every
//! response. Kraken returns at most the 720 most recent buckets; longer
//! lookbacks come back truncated at the old end.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use coinhist_core::{
    BucketReader, CoinhistError, ExchangeConnector, GatewayConfig, Granularity, IntervalToken,
    PricePoint, ResolvePolicy, decode_json, newest_first,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapter::{HttpTransport, endpoint, fetch_ok, validate_base};

const NAME: &str = "kraken";
const PAIR: &str = "XXBTZUSD";
const OPEN_IDX: usize = 1;

/// Bucket width per supported token.
pub const GRANULARITIES: &[(IntervalToken, Granularity)] = &[
    (IntervalToken::TwoYear, Granularity::DAY),
    (IntervalToken::Year, Granularity::DAY),
    (IntervalToken::SixMonth, Granularity::DAY),
    (IntervalToken::ThreeMonth, Granularity::DAY),
    (IntervalToken::Month, Granularity::DAY),
    (IntervalToken::Week, Granularity::FIFTEEN_MINUTES),
    (IntervalToken::Day, Granularity::FIVE_MINUTES),
];

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: Option<Map<String, Value>>,
}

/// Connector for Kraken's `/0/public/OHLC`.
pub struct KrakenConnector {
    transport: Arc<dyn HttpTransport>,
    base: String,
}

impl KrakenConnector {
    /// Build against `base`, e.g. `https://api.kraken.com`.
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
        Self::new(transport, &cfg.endpoints.kraken)
    }
}

/// Decode an OHLC envelope into price points (open price), newest first.
///
/// # Errors
/// - `Upstream` carrying `error[0]` when the envelope reports an error.
/// - `Decode` for malformed JSON, a missing pair, or short rows.
pub fn decode_buckets(body: &[u8]) -> Result<Vec<PricePoint>, CoinhistError> {
    let env: Envelope = decode_json(NAME, body)?;
    if let Some(first) = env.error.into_iter().next() {
        return Err(CoinhistError::upstream(NAME, first));
    }
    let rows = env
        .result
        .as_ref()
        .and_then(|r| r.get(PAIR))
        .and_then(Value::as_array)
        .ok_or_else(|| CoinhistError::decode(NAME, format!("result has no {PAIR} series")))?;
    let mut out = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let r = BucketReader::new(NAME, i, row)?;
            Ok(PricePoint::new(r.i64_at(0)?, r.decimal_at(OPEN_IDX)?))
        })
        .collect::<Result<Vec<_>, CoinhistError>>()?;
    newest_first(&mut out);
    Ok(out)
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Envelope>(body)
        .ok()
        .and_then(|e| e.error.into_iter().next())
}

#[async_trait]
impl ExchangeConnector for KrakenConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Kraken"
    }

    fn granularities(&self) -> &'static [(IntervalToken, Granularity)] {
        GRANULARITIES
    }

    fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy::single().rounded(TimeDelta::minutes(5))
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "coinhist_exchanges::kraken::history", skip(self))
    )]
    async fn history(
        &self,
        token: IntervalToken,
        now: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoinhistError> {
        let plan = self.resolve(token, now)?;
        let range = plan.full_range();
        let url = endpoint(
            NAME,
            &self.base,
            "0/public/OHLC",
            &[
                ("pair", PAIR.to_string()),
                ("interval", plan.granularity.as_minutes().to_string()),
                ("since", range.start.timestamp().to_string()),
            ],
        )?;
        let body = fetch_ok(self.transport.as_ref(), NAME, url, error_message).await?;
        decode_buckets(&body)
    }
}
